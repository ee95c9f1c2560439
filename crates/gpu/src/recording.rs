//! An in-memory [`GlContext`] that records every call.
//!
//! Compilation is simulated closely enough to exercise error paths: a shader
//! with unbalanced brackets or without `void main` fails to compile with a
//! driver-style info log, a program with a failed shader fails to link, and
//! attribute/uniform lookups only resolve names the attached sources declare
//! once the program has linked.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::math::Mat4;
use serde::Serialize;

use crate::context::{Color, GlContext, ShaderStage};
use crate::renderer::DrawCall;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum GlCall {
    CreateShader {
        stage: ShaderStage,
        shader: u32,
    },
    ShaderSource {
        shader: u32,
    },
    CompileShader {
        shader: u32,
    },
    CreateProgram {
        program: u32,
    },
    AttachShader {
        program: u32,
        shader: u32,
    },
    LinkProgram {
        program: u32,
    },
    ValidateProgram {
        program: u32,
    },
    UseProgram {
        program: u32,
    },
    CreateBuffer {
        buffer: u32,
    },
    BufferData {
        buffer: u32,
        data: Vec<f32>,
    },
    VertexAttribPointer {
        location: u32,
        components: i32,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray {
        location: u32,
    },
    UniformMatrix4 {
        name: Option<String>,
        matrix: [f32; 16],
    },
    ClearColor {
        rgba: [f32; 4],
    },
    Clear,
    DrawTriangles {
        first: i32,
        count: i32,
    },
}

impl GlCall {
    pub fn is_draw_operation(&self) -> bool {
        matches!(
            self,
            GlCall::Clear | GlCall::ClearColor { .. } | GlCall::DrawTriangles { .. }
        )
    }
}

/// Objects the context refuses to create, as a lost context would.
#[derive(Debug, Copy, Clone, Default)]
pub struct Faults {
    pub no_shaders: bool,
    pub no_programs: bool,
    pub no_buffers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedShader(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedProgram(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBuffer(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUniform {
    name: String,
}

#[derive(Debug)]
struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: Option<Result<(), String>>,
}

#[derive(Debug, Default)]
struct ProgramState {
    shaders: Vec<u32>,
    linked: Option<Result<(), String>>,
    validated: Option<Result<(), String>>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    faults: Faults,
    calls: Vec<GlCall>,
    shaders: BTreeMap<u32, ShaderState>,
    programs: BTreeMap<u32, ProgramState>,
    uniforms: BTreeMap<String, Mat4>,
}

impl State {
    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn linked(&self, program: u32) -> bool {
        self.programs
            .get(&program)
            .is_some_and(|p| matches!(p.linked, Some(Ok(()))))
    }

    fn attached_sources(&self, program: u32) -> impl Iterator<Item = &ShaderState> + '_ {
        self.programs
            .get(&program)
            .into_iter()
            .flat_map(|p| p.shaders.iter())
            .filter_map(|id| self.shaders.get(id))
    }
}

/// Cheap to clone; clones share the same recorded state.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    state: Rc<RefCell<State>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        let ctx = Self::default();
        ctx.state.borrow_mut().faults = faults;
        ctx
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn reset_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                GlCall::DrawTriangles { first, count } => Some(DrawCall {
                    first: *first,
                    count: *count,
                }),
                _ => None,
            })
            .collect()
    }

    /// Every buffer upload, in order.
    pub fn uploads(&self) -> Vec<Vec<f32>> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                GlCall::BufferData { data, .. } => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Last matrix uploaded to the named uniform.
    pub fn uniform(&self, name: &str) -> Option<Mat4> {
        self.state.borrow().uniforms.get(name).copied()
    }

    pub fn has_drawn(&self) -> bool {
        self.state.borrow().calls.iter().any(GlCall::is_draw_operation)
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

fn syntax_error(line: usize, token: char, detail: &str) -> String {
    format!("ERROR: 0:{line}: '{token}' : syntax error{detail}\n")
}

fn check_glsl(source: &str) -> Result<(), String> {
    let mut open: Vec<(char, usize)> = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        for ch in line.chars() {
            match ch {
                '(' | '{' => open.push((ch, idx + 1)),
                ')' | '}' => {
                    let expected = if ch == ')' { '(' } else { '{' };
                    match open.pop() {
                        Some((c, _)) if c == expected => {}
                        _ => return Err(syntax_error(idx + 1, ch, "")),
                    }
                }
                _ => {}
            }
        }
    }
    if let Some((ch, line)) = open.pop() {
        return Err(syntax_error(line, ch, ": unexpected end of file"));
    }
    if !source.contains("void main") {
        return Err("ERROR: 0:0: 'main' : function not defined\n".to_string());
    }
    Ok(())
}

/// Names from declarations like `attribute vec3 vertPosition;`.
fn declared(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.split_whitespace().next() == Some(qualifier))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_string)
        .collect()
}

impl GlContext for RecordingContext {
    type Shader = RecordedShader;
    type Program = RecordedProgram;
    type Buffer = RecordedBuffer;
    type UniformLocation = RecordedUniform;

    fn create_shader(&self, stage: ShaderStage) -> Option<RecordedShader> {
        let mut state = self.state.borrow_mut();
        if state.faults.no_shaders {
            return None;
        }
        let id = state.alloc();
        state.shaders.insert(
            id,
            ShaderState {
                stage,
                source: String::new(),
                compiled: None,
            },
        );
        state.calls.push(GlCall::CreateShader { stage, shader: id });
        Some(RecordedShader(id))
    }

    fn shader_source(&self, shader: &RecordedShader, source: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(s) = state.shaders.get_mut(&shader.0) {
            s.source = source.to_string();
        }
        state.calls.push(GlCall::ShaderSource { shader: shader.0 });
    }

    fn compile_shader(&self, shader: &RecordedShader) {
        let mut state = self.state.borrow_mut();
        if let Some(s) = state.shaders.get_mut(&shader.0) {
            s.compiled = Some(check_glsl(&s.source));
        }
        state.calls.push(GlCall::CompileShader { shader: shader.0 });
    }

    fn shader_compiled(&self, shader: &RecordedShader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .is_some_and(|s| matches!(s.compiled, Some(Ok(()))))
    }

    fn shader_info_log(&self, shader: &RecordedShader) -> Option<String> {
        let state = self.state.borrow();
        let s = state.shaders.get(&shader.0)?;
        Some(match &s.compiled {
            Some(Err(log)) => log.clone(),
            _ => String::new(),
        })
    }

    fn create_program(&self) -> Option<RecordedProgram> {
        let mut state = self.state.borrow_mut();
        if state.faults.no_programs {
            return None;
        }
        let id = state.alloc();
        state.programs.insert(id, ProgramState::default());
        state.calls.push(GlCall::CreateProgram { program: id });
        Some(RecordedProgram(id))
    }

    fn attach_shader(&self, program: &RecordedProgram, shader: &RecordedShader) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&program.0) {
            p.shaders.push(shader.0);
        }
        state.calls.push(GlCall::AttachShader {
            program: program.0,
            shader: shader.0,
        });
    }

    fn link_program(&self, program: &RecordedProgram) {
        let mut state = self.state.borrow_mut();
        let mut result = Ok(());
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            let mut attached = state.attached_sources(program.0).filter(|s| s.stage == stage);
            match attached.next() {
                None => result = Err(format!("Missing {} shader.\n", stage.label())),
                Some(s) if !matches!(s.compiled, Some(Ok(()))) => {
                    result = Err(format!("Attached {} shader is not compiled.\n", stage.label()))
                }
                Some(_) => {}
            }
            if result.is_err() {
                break;
            }
        }
        if let Some(p) = state.programs.get_mut(&program.0) {
            p.linked = Some(result);
        }
        state.calls.push(GlCall::LinkProgram { program: program.0 });
    }

    fn program_linked(&self, program: &RecordedProgram) -> bool {
        self.state.borrow().linked(program.0)
    }

    fn validate_program(&self, program: &RecordedProgram) {
        let mut state = self.state.borrow_mut();
        let result = if state.linked(program.0) {
            Ok(())
        } else {
            Err("Program has not been successfully linked.\n".to_string())
        };
        if let Some(p) = state.programs.get_mut(&program.0) {
            p.validated = Some(result);
        }
        state.calls.push(GlCall::ValidateProgram { program: program.0 });
    }

    fn program_validated(&self, program: &RecordedProgram) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .is_some_and(|p| matches!(p.validated, Some(Ok(()))))
    }

    fn program_info_log(&self, program: &RecordedProgram) -> Option<String> {
        let state = self.state.borrow();
        let p = state.programs.get(&program.0)?;
        let log = [&p.linked, &p.validated]
            .into_iter()
            .filter_map(|r| match r {
                Some(Err(log)) => Some(log.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");
        Some(log)
    }

    fn use_program(&self, program: &RecordedProgram) {
        self.record(GlCall::UseProgram { program: program.0 });
    }

    fn create_buffer(&self) -> Option<RecordedBuffer> {
        let mut state = self.state.borrow_mut();
        if state.faults.no_buffers {
            return None;
        }
        let id = state.alloc();
        state.calls.push(GlCall::CreateBuffer { buffer: id });
        Some(RecordedBuffer(id))
    }

    fn upload_static_floats(&self, buffer: &RecordedBuffer, data: &[f32]) {
        self.record(GlCall::BufferData {
            buffer: buffer.0,
            data: data.to_vec(),
        });
    }

    fn attrib_location(&self, program: &RecordedProgram, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        if !state.linked(program.0) {
            return None;
        }
        state
            .attached_sources(program.0)
            .filter(|s| s.stage == ShaderStage::Vertex)
            .flat_map(|s| declared(&s.source, "attribute"))
            .position(|attr| attr == name)
            .map(|idx| idx as u32)
    }

    fn vertex_attrib_pointer(&self, location: u32, components: i32, stride: i32, offset: i32) {
        self.record(GlCall::VertexAttribPointer {
            location,
            components,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(GlCall::EnableVertexAttribArray { location });
    }

    fn uniform_location(&self, program: &RecordedProgram, name: &str) -> Option<RecordedUniform> {
        let state = self.state.borrow();
        if !state.linked(program.0) {
            return None;
        }
        let found = state
            .attached_sources(program.0)
            .any(|s| declared(&s.source, "uniform").iter().any(|u| u == name));
        found.then(|| RecordedUniform {
            name: name.to_string(),
        })
    }

    fn uniform_matrix4(&self, location: Option<&RecordedUniform>, matrix: &[f32; 16]) {
        let mut state = self.state.borrow_mut();
        if let Some(loc) = location {
            state.uniforms.insert(loc.name.clone(), Mat4(*matrix));
        }
        state.calls.push(GlCall::UniformMatrix4 {
            name: location.map(|loc| loc.name.clone()),
            matrix: *matrix,
        });
    }

    fn clear_color(&self, color: Color) {
        self.record(GlCall::ClearColor {
            rgba: color.to_array(),
        });
    }

    fn clear(&self) {
        self.record(GlCall::Clear);
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(GlCall::DrawTriangles { first, count });
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingContext, check_glsl, declared};
    use crate::context::{GlContext, ShaderStage};
    use pretty_assertions::assert_eq;

    #[test]
    fn glsl_check_flags_unbalanced_brackets() {
        assert!(check_glsl("void main() { gl_FragColor = vec4(1.0); }").is_ok());
        let err = check_glsl("void main() {\n  x = vec4(1.0;\n}").unwrap_err();
        assert!(err.starts_with("ERROR: 0:3:"), "{err}");
        assert!(check_glsl("void main() {").is_err());
        assert!(check_glsl("float f() { return 1.0; }").is_err());
    }

    #[test]
    fn declarations_are_collected_in_order() {
        let src = "attribute vec3 vertPosition;\n  attribute vec3 vertColor;\nuniform mat4 mWorld;";
        assert_eq!(declared(src, "attribute"), vec!["vertPosition", "vertColor"]);
        assert_eq!(declared(src, "uniform"), vec!["mWorld"]);
    }

    #[test]
    fn lookups_require_a_linked_program() {
        let gl = RecordingContext::new();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(&vs, "attribute vec2 vertPosition;\nvoid main() {}");
        gl.compile_shader(&vs);
        let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(&fs, "void main() {}");
        gl.compile_shader(&fs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);

        assert_eq!(gl.attrib_location(&program, "vertPosition"), None);
        gl.link_program(&program);
        assert!(gl.program_linked(&program));
        assert_eq!(gl.attrib_location(&program, "vertPosition"), Some(0));
        assert_eq!(gl.attrib_location(&program, "vertColor"), None);
    }

    #[test]
    fn clones_share_state() {
        let gl = RecordingContext::new();
        let other = gl.clone();
        other.clear();
        assert!(gl.has_drawn());
    }
}
