use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// The subset of a WebGL 1 rendering context the scenes use.
///
/// Methods mirror `WebGLRenderingContext` but fold the enum plumbing away:
/// status queries return `bool`, attribute locations return `None` instead
/// of `-1`, buffer uploads always target `ARRAY_BUFFER` with `STATIC_DRAW`,
/// and `clear` always clears color and depth.
pub trait GlContext {
    type Shader;
    type Program;
    type Buffer;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn shader_compiled(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn program_linked(&self, program: &Self::Program) -> bool;
    fn validate_program(&self, program: &Self::Program);
    fn program_validated(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    fn use_program(&self, program: &Self::Program);

    fn create_buffer(&self) -> Option<Self::Buffer>;
    /// Binds `buffer` to `ARRAY_BUFFER` and uploads `data` as static draw.
    fn upload_static_floats(&self, buffer: &Self::Buffer, data: &[f32]);

    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<u32>;
    /// Float attribute pointer into the bound array buffer; sizes in bytes.
    fn vertex_attrib_pointer(&self, location: u32, components: i32, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&self, location: u32);

    fn uniform_location(&self, program: &Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, matrix: &[f32; 16]);

    fn clear_color(&self, color: Color);
    /// Clears color and depth.
    fn clear(&self);
    fn draw_triangles(&self, first: i32, count: i32);
}
