//! Shader compilation and program linking.
//!
//! Build failures (compile, link, validate) are reported to the diagnostic
//! sink and do not abort: the program object is still returned and used,
//! possibly drawing nothing. Only a context that refuses to hand out objects
//! at all is treated as an error.

use runtime::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, report};
use serde::Serialize;

use crate::context::{GlContext, ShaderStage};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlObject {
    Shader(ShaderStage),
    Program,
    Buffer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
    /// The context returned no object, usually because it was lost.
    CreateFailed(GlObject),
}

impl std::fmt::Display for GpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuError::CreateFailed(GlObject::Shader(stage)) => {
                write!(f, "could not create {} shader", stage.label())
            }
            GpuError::CreateFailed(GlObject::Program) => write!(f, "could not create program"),
            GpuError::CreateFailed(GlObject::Buffer) => write!(f, "could not create buffer"),
        }
    }
}

impl std::error::Error for GpuError {}

impl GpuError {
    pub(crate) fn report(self, sink: &dyn DiagnosticSink) -> Self {
        report(
            sink,
            Diagnostic::new(DiagnosticKind::ObjectCreation, self.to_string()),
        );
        self
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgramStatus {
    pub vertex_compiled: bool,
    pub fragment_compiled: bool,
    pub linked: bool,
    pub validated: bool,
}

impl ProgramStatus {
    pub fn is_healthy(&self) -> bool {
        self.vertex_compiled && self.fragment_compiled && self.linked && self.validated
    }
}

#[derive(Debug)]
pub struct ShaderProgram<P> {
    pub program: P,
    pub status: ProgramStatus,
}

fn compile_stage<C: GlContext>(
    gl: &C,
    shader: &C::Shader,
    stage: ShaderStage,
    source: &str,
    sink: &dyn DiagnosticSink,
) -> bool {
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    let compiled = gl.shader_compiled(shader);
    if !compiled {
        let kind = match stage {
            ShaderStage::Vertex => DiagnosticKind::VertexCompile,
            ShaderStage::Fragment => DiagnosticKind::FragmentCompile,
        };
        report(
            sink,
            Diagnostic::new(kind, format!("Error compiling {} shader", stage.label()))
                .with_info_log(gl.shader_info_log(shader)),
        );
    }
    compiled
}

/// Compiles both stages, links and validates a program.
pub fn build_program<C: GlContext>(
    gl: &C,
    vertex_source: &str,
    fragment_source: &str,
    sink: &dyn DiagnosticSink,
) -> Result<ShaderProgram<C::Program>, GpuError> {
    let create = |stage| {
        gl.create_shader(stage)
            .ok_or_else(|| GpuError::CreateFailed(GlObject::Shader(stage)).report(sink))
    };
    let vertex_shader = create(ShaderStage::Vertex)?;
    let fragment_shader = create(ShaderStage::Fragment)?;

    let mut status = ProgramStatus {
        vertex_compiled: compile_stage(
            gl,
            &vertex_shader,
            ShaderStage::Vertex,
            vertex_source,
            sink,
        ),
        fragment_compiled: compile_stage(
            gl,
            &fragment_shader,
            ShaderStage::Fragment,
            fragment_source,
            sink,
        ),
        ..Default::default()
    };

    let program = gl
        .create_program()
        .ok_or_else(|| GpuError::CreateFailed(GlObject::Program).report(sink))?;
    gl.attach_shader(&program, &vertex_shader);
    gl.attach_shader(&program, &fragment_shader);

    gl.link_program(&program);
    status.linked = gl.program_linked(&program);
    if !status.linked {
        report(
            sink,
            Diagnostic::new(DiagnosticKind::Link, "Error linking program")
                .with_info_log(gl.program_info_log(&program)),
        );
    }

    gl.validate_program(&program);
    status.validated = gl.program_validated(&program);
    if !status.validated {
        report(
            sink,
            Diagnostic::new(DiagnosticKind::Validate, "Error validating program")
                .with_info_log(gl.program_info_log(&program)),
        );
    }

    tracing::debug!(?status, "shader program built");
    Ok(ShaderProgram { program, status })
}

#[cfg(test)]
mod tests {
    use super::{GlObject, GpuError, build_program};
    use crate::context::ShaderStage;
    use crate::recording::{Faults, RecordingContext};
    use pretty_assertions::assert_eq;
    use runtime::diagnostics::{DiagnosticKind, DiagnosticLog};

    const VS: &str = "
precision mediump float;
attribute vec2 vertPosition;
void main() {
  gl_Position = vec4(vertPosition, 0.0, 1.0);
}";

    const FS: &str = "
precision mediump float;
void main() {
  gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0);
}";

    const BROKEN_FS: &str = "
precision mediump float;
void main() {
  gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0;
}";

    #[test]
    fn healthy_program_reports_nothing() {
        let gl = RecordingContext::new();
        let log = DiagnosticLog::new();
        let built = build_program(&gl, VS, FS, &log).expect("objects available");
        assert!(built.status.is_healthy());
        assert!(log.is_empty());
    }

    #[test]
    fn broken_fragment_shader_is_reported_as_fragment_failure() {
        let gl = RecordingContext::new();
        let log = DiagnosticLog::new();
        let built = build_program(&gl, VS, BROKEN_FS, &log).expect("objects available");

        assert!(built.status.vertex_compiled);
        assert!(!built.status.fragment_compiled);
        let kinds = log.kinds();
        assert_eq!(kinds[0], DiagnosticKind::FragmentCompile);
        assert!(!kinds.contains(&DiagnosticKind::VertexCompile));

        let entry = &log.entries()[0];
        assert_eq!(entry.message, "Error compiling fragment shader");
        assert!(entry.info_log.as_deref().unwrap_or("").contains("syntax error"));
    }

    #[test]
    fn broken_vertex_shader_is_reported_as_vertex_failure() {
        let gl = RecordingContext::new();
        let log = DiagnosticLog::new();
        let built = build_program(&gl, "void main() {", FS, &log).expect("objects available");
        assert!(!built.status.vertex_compiled);
        assert!(built.status.fragment_compiled);
        assert_eq!(log.kinds()[0], DiagnosticKind::VertexCompile);
    }

    #[test]
    fn link_and_validate_failures_are_logged_and_program_is_kept() {
        let gl = RecordingContext::new();
        let log = DiagnosticLog::new();
        let built = build_program(&gl, VS, BROKEN_FS, &log).expect("objects available");
        assert!(!built.status.linked);
        assert!(!built.status.validated);
        assert_eq!(
            log.kinds(),
            vec![
                DiagnosticKind::FragmentCompile,
                DiagnosticKind::Link,
                DiagnosticKind::Validate
            ]
        );
    }

    #[test]
    fn missing_program_object_is_an_error() {
        let gl = RecordingContext::with_faults(Faults {
            no_programs: true,
            ..Default::default()
        });
        let log = DiagnosticLog::new();
        let err = build_program(&gl, VS, FS, &log).unwrap_err();
        assert_eq!(err, GpuError::CreateFailed(GlObject::Program));
        assert_eq!(log.kinds(), vec![DiagnosticKind::ObjectCreation]);
    }

    #[test]
    fn missing_shader_object_is_an_error() {
        let gl = RecordingContext::with_faults(Faults {
            no_shaders: true,
            ..Default::default()
        });
        let log = DiagnosticLog::new();
        let err = build_program(&gl, VS, FS, &log).unwrap_err();
        assert_eq!(
            err,
            GpuError::CreateFailed(GlObject::Shader(ShaderStage::Vertex))
        );
    }
}
