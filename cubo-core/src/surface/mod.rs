//! The drawing surface the pipeline renders into.
//!
//! [`Surface`] is the narrow slice of an immediate-mode graphics API that the pipeline needs:
//! buffers, shaders, programs, uniforms, textures, clears and an indexed draw. Every GPU object
//! in this crate holds an `Arc<S>` to the surface it was created on and releases itself through
//! it on drop. [`GlowSurface`] is the OpenGL implementation.

mod gl;
#[cfg(test)]
pub(crate) mod recording;

use std::fmt::Debug;

pub use gl::GlowSurface;

/// A programmable pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// The binding point a buffer is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Array,
    /// Index data for indexed draws.
    ElementArray,
}

/// Depth comparison used by the depth test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    LessOrEqual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    ClampToEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Linear,
    /// Trilinear filtering across the mipmap chain.
    LinearMipmapLinear,
}

/// A sampling parameter of the currently bound 2D texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureParameter {
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    MinFilter(TextureFilter),
}

/// A handle to a renderable target and the graphics API behind it.
///
/// All calls must happen on the thread that owns the surface. Creation calls return the
/// driver's message on failure; the pipeline turns those into
/// [`PipelineError::ResourceAllocation`](crate::PipelineError::ResourceAllocation).
pub trait Surface {
    type Buffer: Copy + Debug;
    type VertexArray: Copy + Debug;
    type Shader: Copy + Debug;
    type Program: Copy + Debug;
    type Texture: Copy + Debug;
    type UniformLocation: Debug;

    /// The current size of the drawable area in pixels.
    fn drawable_size(&self) -> (u32, u32);
    fn viewport(&self, width: u32, height: u32);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Uploads `data` to the buffer bound at `target` with a static usage hint.
    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    /// Points attribute `index` at the bound array buffer as `components` floats per vertex.
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    fn uniform_matrix_4(&self, location: &Self::UniformLocation, value: &[f32; 16]);
    fn uniform_i32(&self, location: &Self::UniformLocation, value: i32);

    fn create_texture(&self) -> Result<Self::Texture, String>;
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, texture: Option<Self::Texture>);
    /// Uploads tightly packed RGBA8 pixels as level 0 of the bound 2D texture.
    fn tex_image_rgba(&self, width: u32, height: u32, pixels: &[u8]);
    fn tex_parameter(&self, parameter: TextureParameter);
    fn generate_mipmap(&self);
    fn delete_texture(&self, texture: Self::Texture);

    fn clear_color(&self, rgba: [f32; 4]);
    fn clear_depth(&self, depth: f32);
    /// Clears both the color and the depth buffer.
    fn clear(&self);
    fn enable_depth_test(&self, func: DepthFunc);
    /// Draws `count` vertices as triangles using 16-bit indices from the bound index buffer.
    fn draw_triangles_u16(&self, count: i32, offset: i32);

    /// Returns and clears the oldest error flag raised by the driver, if any.
    fn take_error(&self) -> Option<u32>;
}
