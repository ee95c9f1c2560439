use foundation::math::Mat4;
use serde::Serialize;

use crate::context::{Color, GlContext};

pub const WORLD_UNIFORM: &str = "mWorld";
pub const VIEW_UNIFORM: &str = "mView";
pub const PROJECTION_UNIFORM: &str = "mProj";

/// World, view and projection matrices. Fresh transforms are all identity.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Transforms {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Uniform locations for [`Transforms`]. A location the program does not
/// expose stays `None`; WebGL treats uploads to a null location as no-ops.
#[derive(Debug)]
pub struct TransformUniforms<U> {
    world: Option<U>,
    view: Option<U>,
    projection: Option<U>,
}

impl<U> TransformUniforms<U> {
    pub fn locate<C>(gl: &C, program: &C::Program) -> Self
    where
        C: GlContext<UniformLocation = U>,
    {
        Self {
            world: gl.uniform_location(program, WORLD_UNIFORM),
            view: gl.uniform_location(program, VIEW_UNIFORM),
            projection: gl.uniform_location(program, PROJECTION_UNIFORM),
        }
    }

    pub fn upload_all<C>(&self, gl: &C, transforms: &Transforms)
    where
        C: GlContext<UniformLocation = U>,
    {
        gl.uniform_matrix4(self.world.as_ref(), transforms.world.as_array());
        gl.uniform_matrix4(self.view.as_ref(), transforms.view.as_array());
        gl.uniform_matrix4(self.projection.as_ref(), transforms.projection.as_array());
    }

    pub fn upload_world<C>(&self, gl: &C, world: &Mat4)
    where
        C: GlContext<UniformLocation = U>,
    {
        gl.uniform_matrix4(self.world.as_ref(), world.as_array());
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct DrawCall {
    pub first: i32,
    pub count: i32,
}

impl DrawCall {
    pub fn triangles(count: i32) -> Self {
        Self { first: 0, count }
    }
}

pub fn clear<C: GlContext>(gl: &C, color: Color) {
    gl.clear_color(color);
    gl.clear();
}

pub fn clear_and_draw<C: GlContext>(gl: &C, color: Color, draw: DrawCall) {
    clear(gl, color);
    gl.draw_triangles(draw.first, draw.count);
}

#[cfg(test)]
mod tests {
    use super::{DrawCall, TransformUniforms, Transforms, clear_and_draw};
    use crate::context::Color;
    use crate::program::build_program;
    use crate::recording::{GlCall, RecordingContext};
    use foundation::math::Mat4;
    use pretty_assertions::assert_eq;
    use runtime::diagnostics::DiagnosticLog;

    const VS: &str = "
uniform mat4 mWorld;
uniform mat4 mView;
attribute vec3 vertPosition;
void main() {
  gl_Position = mView * mWorld * vec4(vertPosition, 1.0);
}";

    const FS: &str = "void main() { gl_FragColor = vec4(1.0); }";

    #[test]
    fn uploads_every_located_matrix() {
        let gl = RecordingContext::new();
        let log = DiagnosticLog::new();
        let built = build_program(&gl, VS, FS, &log).expect("objects available");

        let uniforms = TransformUniforms::locate(&gl, &built.program);
        let transforms = Transforms {
            world: Mat4::rotation_y(1.0),
            ..Default::default()
        };
        gl.reset_calls();
        uniforms.upload_all(&gl, &transforms);

        let uploads: Vec<_> = gl
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                GlCall::UniformMatrix4 { name, .. } => Some(name),
                _ => None,
            })
            .collect();
        // mProj is not declared, so its upload targets a null location.
        assert_eq!(
            uploads,
            vec![Some("mWorld".to_string()), Some("mView".to_string()), None]
        );
        assert_eq!(gl.uniform("mWorld"), Some(Mat4::rotation_y(1.0)));
    }

    #[test]
    fn clear_then_draw() {
        let gl = RecordingContext::new();
        clear_and_draw(&gl, Color::WHITE, DrawCall::triangles(3));
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::ClearColor {
                    rgba: [1.0, 1.0, 1.0, 1.0]
                },
                GlCall::Clear,
                GlCall::DrawTriangles { first: 0, count: 3 },
            ]
        );
    }
}
