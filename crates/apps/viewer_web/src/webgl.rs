use gpu::context::{Color, GlContext, ShaderStage};
use wasm_bindgen::JsValue;
use web_sys::{
    WebGlBuffer, WebGlProgram, WebGlRenderingContext as Gl, WebGlShader, WebGlUniformLocation,
};

/// [`GlContext`] over a browser `WebGLRenderingContext`.
#[derive(Debug, Clone)]
pub struct WebGl {
    gl: Gl,
}

impl WebGl {
    pub fn new(gl: Gl) -> Self {
        Self { gl }
    }
}

fn flag(value: JsValue) -> bool {
    value.as_bool().unwrap_or(false)
}

impl GlContext for WebGl {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => Gl::VERTEX_SHADER,
            ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
        };
        self.gl.create_shader(kind)
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        self.gl.shader_source(shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        self.gl.compile_shader(shader);
    }

    fn shader_compiled(&self, shader: &WebGlShader) -> bool {
        flag(self.gl.get_shader_parameter(shader, Gl::COMPILE_STATUS))
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.gl.get_shader_info_log(shader)
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        self.gl.create_program()
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        self.gl.attach_shader(program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        self.gl.link_program(program);
    }

    fn program_linked(&self, program: &WebGlProgram) -> bool {
        flag(self.gl.get_program_parameter(program, Gl::LINK_STATUS))
    }

    fn validate_program(&self, program: &WebGlProgram) {
        self.gl.validate_program(program);
    }

    fn program_validated(&self, program: &WebGlProgram) -> bool {
        flag(self.gl.get_program_parameter(program, Gl::VALIDATE_STATUS))
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.gl.get_program_info_log(program)
    }

    fn use_program(&self, program: &WebGlProgram) {
        self.gl.use_program(Some(program));
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        self.gl.create_buffer()
    }

    fn upload_static_floats(&self, buffer: &WebGlBuffer, data: &[f32]) {
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl.buffer_data_with_u8_array(
            Gl::ARRAY_BUFFER,
            bytemuck::cast_slice(data),
            Gl::STATIC_DRAW,
        );
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        // -1 means "not an active attribute".
        u32::try_from(self.gl.get_attrib_location(program, name)).ok()
    }

    fn vertex_attrib_pointer(&self, location: u32, components: i32, stride: i32, offset: i32) {
        self.gl
            .vertex_attrib_pointer_with_i32(location, components, Gl::FLOAT, false, stride, offset);
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.gl.enable_vertex_attrib_array(location);
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn uniform_matrix4(&self, location: Option<&WebGlUniformLocation>, matrix: &[f32; 16]) {
        self.gl.uniform_matrix4fv_with_f32_array(location, false, matrix);
    }

    fn clear_color(&self, color: Color) {
        self.gl.clear_color(color.r, color.g, color.b, color.a);
    }

    fn clear(&self) {
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.gl.draw_arrays(Gl::TRIANGLES, first, count);
    }
}
