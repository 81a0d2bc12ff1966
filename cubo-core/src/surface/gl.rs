//! OpenGL surface backed by a [`glow::Context`].

use std::{cell::Cell, sync::Arc};

use glow::HasContext;

use super::{
    BufferTarget, DepthFunc, ShaderStage, Surface, TextureFilter, TextureParameter, TextureWrap,
};

/// A [`Surface`] that forwards to an OpenGL context.
///
/// The context must be current on the calling thread for the lifetime of this surface. The
/// drawable size is tracked here because GL itself does not know about the window; hosts call
/// [`GlowSurface::resize`] when the window changes size.
pub struct GlowSurface {
    gl: Arc<glow::Context>,
    width: Cell<u32>,
    height: Cell<u32>,
}

impl GlowSurface {
    /// Wraps `gl` with an initial drawable size and sets the viewport to match it.
    pub fn new(gl: &Arc<glow::Context>, width: u32, height: u32) -> Self {
        let surface = Self {
            gl: Arc::clone(gl),
            width: Cell::new(width),
            height: Cell::new(height),
        };
        surface.viewport(width, height);
        surface
    }

    /// Records the new drawable size and updates the viewport.
    pub fn resize(&self, width: u32, height: u32) {
        self.width.set(width);
        self.height.set(height);
        self.viewport(width, height);
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn wrap_mode(wrap: TextureWrap) -> i32 {
    match wrap {
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
    }
}

fn filter_mode(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Linear => glow::LINEAR as i32,
        TextureFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR as i32,
    }
}

impl Surface for GlowSurface {
    type Buffer = <glow::Context as HasContext>::Buffer;
    type VertexArray = <glow::Context as HasContext>::VertexArray;
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Texture = <glow::Context as HasContext>::Texture;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    fn drawable_size(&self) -> (u32, u32) {
        (self.width.get(), self.height.get())
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe {
            self.gl.bind_buffer(buffer_target(target), buffer);
        }
    }

    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(target), data, glow::STATIC_DRAW);
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe {
            self.gl.delete_buffer(buffer);
        }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array);
        }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe {
            self.gl.delete_vertex_array(vertex_array);
        }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                components,
                glow::FLOAT,
                normalized,
                stride,
                offset,
            );
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe {
            self.gl.enable_vertex_attrib_array(index);
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(kind) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe {
            self.gl.shader_source(shader, source);
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe {
            self.gl.compile_shader(shader);
        }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe {
            self.gl.delete_shader(shader);
        }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe {
            self.gl.attach_shader(program, shader);
        }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe {
            self.gl.detach_shader(program, shader);
        }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe {
            self.gl.link_program(program);
        }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe {
            self.gl.use_program(program);
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe {
            self.gl.delete_program(program);
        }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_matrix_4(&self, location: &Self::UniformLocation, value: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, value);
        }
    }

    fn uniform_i32(&self, location: &Self::UniformLocation, value: i32) {
        unsafe {
            self.gl.uniform_1_i32(Some(location), value);
        }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn active_texture(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
        }
    }

    fn bind_texture(&self, texture: Option<Self::Texture>) {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, texture);
        }
    }

    fn tex_image_rgba(&self, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn tex_parameter(&self, parameter: TextureParameter) {
        let (name, value) = match parameter {
            TextureParameter::WrapS(wrap) => (glow::TEXTURE_WRAP_S, wrap_mode(wrap)),
            TextureParameter::WrapT(wrap) => (glow::TEXTURE_WRAP_T, wrap_mode(wrap)),
            TextureParameter::MinFilter(filter) => (glow::TEXTURE_MIN_FILTER, filter_mode(filter)),
        };
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, name, value);
        }
    }

    fn generate_mipmap(&self) {
        unsafe {
            self.gl.generate_mipmap(glow::TEXTURE_2D);
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe {
            self.gl.delete_texture(texture);
        }
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        unsafe {
            self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]);
        }
    }

    fn clear_depth(&self, depth: f32) {
        unsafe {
            self.gl.clear_depth_f32(depth);
        }
    }

    fn clear(&self) {
        unsafe {
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn enable_depth_test(&self, func: DepthFunc) {
        let func = match func {
            DepthFunc::LessOrEqual => glow::LEQUAL,
        };
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(func);
        }
    }

    fn draw_triangles_u16(&self, count: i32, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_SHORT, offset);
        }
    }

    fn take_error(&self) -> Option<u32> {
        match unsafe { self.gl.get_error() } {
            glow::NO_ERROR => None,
            code => Some(code),
        }
    }
}
