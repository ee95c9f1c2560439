//! A triangle spinning about the vertical axis, one revolution per period.

use std::f64::consts::TAU;

use foundation::math::{Mat4, Vec3};
use foundation::time::Time;
use gpu::context::{Color, GlContext};
use runtime::diagnostics::DiagnosticSink;
use runtime::frame::Frame;
use runtime::render_loop::RenderLoop;

use crate::assets::{COLOR_FRAGMENT_SHADER, PROJECTED_VERTEX_SHADER, TRIANGLE};
use crate::config::{RotationConfig, SceneConfig};
use crate::error::FrameError;
use crate::host::Host;
use crate::setup::{Pipeline, Projected, SceneOutput, mount_with};

pub const CLEAR_COLOR: Color = Color::WHITE;

/// Angle in radians at `time`; periodic, so `angle(t) == angle(t mod period)`.
pub fn rotation_angle(time: Time, period_s: f64) -> f32 {
    if period_s <= 0.0 {
        return 0.0;
    }
    (time.wrap(period_s).as_secs() / period_s * TAU) as f32
}

pub fn world_at(time: Time, rotation: &RotationConfig) -> Mat4 {
    Mat4::IDENTITY.rotate(
        rotation_angle(time, rotation.period_s),
        Vec3::from(rotation.axis),
    )
}

pub struct RotatingTriangle<C: GlContext> {
    scene: Projected<C>,
    rotation: RotationConfig,
}

impl<C: GlContext> RotatingTriangle<C> {
    pub fn render_frame(&mut self, frame: Frame) {
        let world = world_at(frame.time, &self.rotation);
        self.scene.redraw(world, CLEAR_COLOR);
    }

    pub fn scene(&self) -> &Projected<C> {
        &self.scene
    }
}

impl<C: GlContext + 'static> RotatingTriangle<C> {
    pub fn into_render_loop(mut self) -> RenderLoop<FrameError> {
        RenderLoop::new("rotating-triangle", move |frame| {
            self.render_frame(frame);
            Ok(())
        })
    }
}

pub fn mount<H: Host>(
    host: &H,
    config: &SceneConfig,
    sink: &dyn DiagnosticSink,
) -> Result<SceneOutput<H::Surface, RotatingTriangle<H::Context>>, H::Error> {
    mount_with(host, sink, CLEAR_COLOR, |gl, viewport| {
        let pipeline = Pipeline::build(
            gl,
            PROJECTED_VERTEX_SHADER,
            COLOR_FRAGMENT_SHADER,
            &TRIANGLE,
            sink,
        )?;
        Ok(RotatingTriangle {
            scene: Projected::new(pipeline, &config.camera, viewport),
            rotation: config.rotation.clone(),
        })
    })
}
