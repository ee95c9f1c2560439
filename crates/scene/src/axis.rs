//! A triangle rotated by two slider inputs, one per axis.

use std::rc::Rc;

use foundation::math::Mat4;
use gpu::context::{Color, GlContext};
use runtime::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, report};
use runtime::frame::Frame;
use runtime::render_loop::RenderLoop;

use crate::assets::{COLOR_FRAGMENT_SHADER, PROJECTED_VERTEX_SHADER, TRIANGLE};
use crate::config::{SceneConfig, SliderConfig};
use crate::error::{FrameError, InputError};
use crate::host::{AngleInput, Host};
use crate::setup::{Pipeline, Projected, SceneOutput, mount_with};

pub const CLEAR_COLOR: Color = Color::rgba(0.75, 0.85, 0.8, 1.0);

/// `x_value` turns about the vertical axis, `y_value` about the horizontal
/// one; the horizontal rotation is applied first.
pub fn world_from_sliders(x_value: f32, y_value: f32, divisor: f32) -> Mat4 {
    Mat4::rotation_y(x_value / divisor) * Mat4::rotation_x(y_value / divisor)
}

struct Slider<I> {
    id: String,
    input: Option<I>,
}

impl<I: AngleInput> Slider<I> {
    fn read(&self) -> Result<f32, InputError> {
        let input = self.input.as_ref().ok_or_else(|| InputError::Missing {
            id: self.id.clone(),
        })?;
        let raw = input.raw_value();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        trimmed.parse().map_err(|_| InputError::NotNumeric {
            id: self.id.clone(),
            value: raw.clone(),
        })
    }
}

/// Both slider handles, looked up once when the scene is set up. An absent
/// element stays absent; reading it fails on every frame.
pub struct SliderAngles<I> {
    x: Slider<I>,
    y: Slider<I>,
    divisor: f32,
}

impl<I: AngleInput> SliderAngles<I> {
    pub fn locate<H: Host<Input = I>>(host: &H, config: &SliderConfig) -> Self {
        let slider = |id: &str| {
            let input = host.find_input(id);
            if input.is_none() {
                tracing::warn!(id, "slider element not found");
            }
            Slider {
                id: id.to_string(),
                input,
            }
        };
        Self {
            x: slider(config.x_input_id.as_str()),
            y: slider(config.y_input_id.as_str()),
            divisor: config.divisor,
        }
    }

    pub fn read(&self) -> Result<(f32, f32), InputError> {
        Ok((self.x.read()?, self.y.read()?))
    }

    pub fn world(&self) -> Result<Mat4, InputError> {
        let (x, y) = self.read()?;
        Ok(world_from_sliders(x, y, self.divisor))
    }
}

pub struct AxisTriangle<C: GlContext, I> {
    scene: Projected<C>,
    angles: SliderAngles<I>,
}

impl<C: GlContext, I: AngleInput> AxisTriangle<C, I> {
    pub fn render_frame(&mut self, _frame: Frame) -> Result<(), FrameError> {
        let world = self.angles.world()?;
        self.scene.redraw(world, CLEAR_COLOR);
        Ok(())
    }

    pub fn scene(&self) -> &Projected<C> {
        &self.scene
    }
}

impl<C: GlContext + 'static, I: AngleInput + 'static> AxisTriangle<C, I> {
    /// The loop stops on the first frame whose inputs cannot be read, after
    /// reporting the failure to `sink`.
    pub fn into_render_loop(mut self, sink: Rc<dyn DiagnosticSink>) -> RenderLoop<FrameError> {
        RenderLoop::new("axis-triangle", move |frame| {
            self.render_frame(frame).inspect_err(|err| {
                report(
                    &*sink,
                    Diagnostic::new(DiagnosticKind::FrameFailed, err.to_string()),
                );
            })
        })
    }
}

pub fn mount<H: Host>(
    host: &H,
    config: &SceneConfig,
    sink: &dyn DiagnosticSink,
) -> Result<SceneOutput<H::Surface, AxisTriangle<H::Context, H::Input>>, H::Error> {
    let angles = SliderAngles::locate(host, &config.sliders);
    mount_with(host, sink, CLEAR_COLOR, |gl, viewport| {
        let pipeline = Pipeline::build(
            gl,
            PROJECTED_VERTEX_SHADER,
            COLOR_FRAGMENT_SHADER,
            &TRIANGLE,
            sink,
        )?;
        Ok(AxisTriangle {
            scene: Projected::new(pipeline, &config.camera, viewport),
            angles,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::{mount, world_from_sliders};
    use crate::config::SceneConfig;
    use crate::error::{FrameError, InputError};
    use crate::host::HeadlessHost;
    use crate::setup::Setup;
    use foundation::math::Mat4;
    use foundation::time::Time;
    use gpu::surface::Viewport;
    use pretty_assertions::assert_eq;
    use runtime::diagnostics::{DiagnosticKind, DiagnosticLog};
    use runtime::frame::Frame;
    use runtime::render_loop::LoopControl;
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    const TOL: f32 = 1e-5;

    fn host_with_sliders(x: &str, y: &str) -> HeadlessHost {
        let host = HeadlessHost::new(Viewport::new(800, 600));
        host.add_input("xAngle", x);
        host.add_input("yAngle", y);
        host
    }

    #[test]
    fn zero_sliders_give_identity_world() {
        assert_eq!(world_from_sliders(0.0, 0.0, 120.0), Mat4::IDENTITY);
    }

    #[test]
    fn sliders_compose_vertical_after_horizontal() {
        let x = 120.0 * FRAC_PI_2;
        let y = 60.0;
        let expected = Mat4::rotation_y(FRAC_PI_2) * Mat4::rotation_x(0.5);
        assert!(world_from_sliders(x, y, 120.0).approx_eq(&expected, TOL));
        let reversed = Mat4::rotation_x(0.5) * Mat4::rotation_y(FRAC_PI_2);
        assert!(!world_from_sliders(x, y, 120.0).approx_eq(&reversed, TOL));
    }

    #[test]
    fn frame_reads_current_slider_values() {
        let host = HeadlessHost::new(Viewport::new(800, 600));
        let x_slider = host.add_input("xAngle", "0");
        host.add_input("yAngle", "0");
        let output = mount(&host, &SceneConfig::default(), &DiagnosticLog::new()).unwrap();
        let gl = output.surface.context().clone();
        let Setup::Ready(mut triangle) = output.setup else {
            panic!("scene should be ready");
        };

        triangle.render_frame(Frame::first(Time(0.0))).unwrap();
        assert_eq!(gl.uniform("mWorld"), Some(Mat4::IDENTITY));

        x_slider.set("120");
        triangle.render_frame(Frame::first(Time(0.1))).unwrap();
        let world = gl.uniform("mWorld").unwrap();
        assert!(world.approx_eq(&Mat4::rotation_y(1.0), TOL));
        assert_eq!(triangle.scene().transforms().world, world);
    }

    #[test]
    fn empty_value_reads_as_zero() {
        let host = host_with_sliders("", " ");
        let output = mount(&host, &SceneConfig::default(), &DiagnosticLog::new()).unwrap();
        let mut triangle = output.setup.ready().expect("ready");
        assert!(triangle.render_frame(Frame::first(Time(0.0))).is_ok());
    }

    #[test]
    fn non_numeric_value_fails_the_frame() {
        let host = host_with_sliders("12deg", "0");
        let output = mount(&host, &SceneConfig::default(), &DiagnosticLog::new()).unwrap();
        let mut triangle = output.setup.ready().expect("ready");
        assert_eq!(
            triangle.render_frame(Frame::first(Time(0.0))),
            Err(FrameError::Input(InputError::NotNumeric {
                id: "xAngle".to_string(),
                value: "12deg".to_string(),
            }))
        );
    }

    #[test]
    fn missing_slider_stops_loop_after_one_diagnostic() {
        let host = HeadlessHost::new(Viewport::new(800, 600));
        host.add_input("xAngle", "30");
        let log = Rc::new(DiagnosticLog::new());
        let output = mount(&host, &SceneConfig::default(), &*log).unwrap();
        let gl = output.surface.context().clone();
        let mut render_loop = output
            .setup
            .ready()
            .expect("setup does not need the sliders")
            .into_render_loop(log.clone());

        assert_eq!(render_loop.tick(Time(0.0)), LoopControl::Stop);
        assert_eq!(render_loop.tick(Time(0.1)), LoopControl::Stop);
        assert_eq!(log.kinds(), vec![DiagnosticKind::FrameFailed]);
        assert!(log.entries()[0].message.contains("yAngle"));
        assert!(gl.draw_calls().is_empty());
    }

    #[test]
    fn no_context_leaves_surface_untouched() {
        let host = host_with_sliders("0", "0").without_webgl();
        let output = mount(&host, &SceneConfig::default(), &DiagnosticLog::new()).unwrap();
        assert!(!output.setup.is_ready());
        assert!(output.surface.context().calls().is_empty());
    }
}
