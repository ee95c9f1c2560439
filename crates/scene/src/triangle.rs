//! A flat, untransformed triangle drawn exactly once.

use gpu::context::{Color, GlContext};
use gpu::program::ProgramStatus;
use gpu::renderer::DrawCall;
use runtime::diagnostics::DiagnosticSink;

use crate::assets::{COLOR_FRAGMENT_SHADER, FLAT_TRIANGLE, FLAT_VERTEX_SHADER};
use crate::host::Host;
use crate::setup::{Pipeline, SceneOutput, mount_with};

pub const CLEAR_COLOR: Color = Color::WHITE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTriangle {
    pub draw: DrawCall,
    pub status: ProgramStatus,
}

pub fn mount<H: Host>(
    host: &H,
    sink: &dyn DiagnosticSink,
) -> Result<SceneOutput<H::Surface, StaticTriangle>, H::Error> {
    mount_with(host, sink, CLEAR_COLOR, |gl, _viewport| {
        let pipeline = Pipeline::build(
            gl,
            FLAT_VERTEX_SHADER,
            COLOR_FRAGMENT_SHADER,
            &FLAT_TRIANGLE,
            sink,
        )?;
        let draw = pipeline.draw_call();
        pipeline.gl.draw_triangles(draw.first, draw.count);
        Ok(StaticTriangle {
            draw,
            status: pipeline.program.status,
        })
    })
}
