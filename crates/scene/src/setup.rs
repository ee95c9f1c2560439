//! The setup sequence every scene shares: size a surface to the viewport,
//! acquire a context, build the program, upload geometry.

use foundation::math::Mat4;
use gpu::context::{Color, GlContext};
use gpu::program::{ShaderProgram, build_program};
use gpu::renderer::{self, DrawCall, TransformUniforms, Transforms};
use gpu::surface::{Surface, Viewport};
use gpu::vertex::{InterleavedVertex, VertexBuffer, upload_vertices};
use runtime::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, report};

use crate::config::CameraConfig;
use crate::error::DegradeReason;
use crate::host::Host;

/// Outcome of scene setup: ready to render, or degraded to a no-op.
pub enum Setup<R> {
    Ready(R),
    Degraded(DegradeReason),
}

impl<R> Setup<R> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Setup::Ready(_))
    }

    pub fn ready(self) -> Option<R> {
        match self {
            Setup::Ready(r) => Some(r),
            Setup::Degraded(_) => None,
        }
    }

    pub fn degraded(&self) -> Option<&DegradeReason> {
        match self {
            Setup::Ready(_) => None,
            Setup::Degraded(reason) => Some(reason),
        }
    }
}

/// The surface is returned in every case so the caller can mount it.
pub struct SceneOutput<S, R> {
    pub surface: S,
    pub setup: Setup<R>,
}

/// Creates a surface sized to the viewport as it is right now.
pub fn prepare_surface<H: Host>(host: &H) -> Result<H::Surface, H::Error> {
    let viewport = host.viewport();
    let surface = host.create_surface()?;
    surface.resize(viewport);
    tracing::debug!(width = viewport.width, height = viewport.height, "surface sized to viewport");
    Ok(surface)
}

pub fn acquire_context<H: Host>(
    host: &H,
    surface: &H::Surface,
    sink: &dyn DiagnosticSink,
) -> Result<H::Context, DegradeReason> {
    host.acquire_context(surface).ok_or_else(|| {
        report(
            sink,
            Diagnostic::new(
                DiagnosticKind::ContextUnavailable,
                "Your browser does not support WebGL",
            ),
        );
        DegradeReason::ContextUnavailable
    })
}

/// Runs the shared prefix of every scene, then hands the cleared context to
/// `build`. Any [`DegradeReason`] becomes [`Setup::Degraded`].
pub fn mount_with<H, R>(
    host: &H,
    sink: &dyn DiagnosticSink,
    clear: Color,
    build: impl FnOnce(H::Context, Viewport) -> Result<R, DegradeReason>,
) -> Result<SceneOutput<H::Surface, R>, H::Error>
where
    H: Host,
{
    let surface = prepare_surface(host)?;
    let setup = match acquire_context(host, &surface, sink) {
        Ok(gl) => {
            renderer::clear(&gl, clear);
            match build(gl, surface.size()) {
                Ok(ready) => Setup::Ready(ready),
                Err(reason) => Setup::Degraded(reason),
            }
        }
        Err(reason) => Setup::Degraded(reason),
    };
    if let Some(reason) = setup.degraded() {
        tracing::info!(%reason, "scene degraded to an undrawn surface");
    }
    Ok(SceneOutput { surface, setup })
}

/// A linked program in use with its static geometry bound.
pub struct Pipeline<C: GlContext> {
    pub gl: C,
    pub program: ShaderProgram<C::Program>,
    pub vertices: VertexBuffer<C::Buffer>,
}

impl<C: GlContext> Pipeline<C> {
    pub fn build<V: InterleavedVertex>(
        gl: C,
        vertex_source: &str,
        fragment_source: &str,
        vertices: &[V],
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, DegradeReason> {
        let program = build_program(&gl, vertex_source, fragment_source, sink)?;
        let vertices = upload_vertices(&gl, &program.program, vertices, sink)?;
        gl.use_program(&program.program);
        Ok(Self {
            gl,
            program,
            vertices,
        })
    }

    pub fn draw_call(&self) -> DrawCall {
        DrawCall::triangles(self.vertices.vertex_count)
    }
}

/// A pipeline plus world/view/projection state. View and projection are
/// fixed at construction; the world matrix is replaced every redraw.
pub struct Projected<C: GlContext> {
    pipeline: Pipeline<C>,
    uniforms: TransformUniforms<C::UniformLocation>,
    transforms: Transforms,
}

impl<C: GlContext> Projected<C> {
    pub fn new(pipeline: Pipeline<C>, camera: &CameraConfig, viewport: Viewport) -> Self {
        let uniforms = TransformUniforms::locate(&pipeline.gl, &pipeline.program.program);
        let transforms = Transforms {
            world: Mat4::IDENTITY,
            view: camera.view(),
            projection: camera.projection(viewport),
        };
        uniforms.upload_all(&pipeline.gl, &transforms);
        Self {
            pipeline,
            uniforms,
            transforms,
        }
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn pipeline(&self) -> &Pipeline<C> {
        &self.pipeline
    }

    pub fn redraw(&mut self, world: Mat4, clear: Color) {
        self.transforms.world = world;
        self.uniforms.upload_world(&self.pipeline.gl, &world);
        renderer::clear_and_draw(&self.pipeline.gl, clear, self.pipeline.draw_call());
    }
}
