//! Per-frame drawing of the textured cube.

use glam::{Mat4, Vec3};

use crate::{
    error::PipelineError,
    geometry::{GeometryBuffer, POSITION_COMPONENTS, TEX_COORD_COMPONENTS},
    shader::ShaderProgram,
    surface::{BufferTarget, DepthFunc, Surface},
    texture::Texture,
};

/// Camera and motion parameters of the scene.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// RGBA the color buffer is cleared to.
    pub clear_color: [f32; 4],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// How far in front of the camera the cube is placed.
    pub distance: f32,
    /// Y-axis rotation as a fraction of the Z-axis rotation.
    pub y_rotation_ratio: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            distance: 6.0,
            y_rotation_ratio: 0.7,
        }
    }
}

/// Everything a frame reads from: the linked program, the uploaded geometry and the texture.
/// The renderer borrows them; their lifetimes belong to the caller.
pub struct FrameResources<'a, S: Surface> {
    pub program: &'a ShaderProgram<S>,
    pub geometry: &'a GeometryBuffer<S>,
    pub texture: &'a Texture<S>,
}

/// Draws one frame at a time and accumulates the cube rotation.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    view: ViewConfig,
    cube_rotation: f32,
    draw_calls: u64,
}

impl FrameRenderer {
    pub fn new(view: ViewConfig) -> Self {
        Self {
            view,
            cube_rotation: 0.0,
            draw_calls: 0,
        }
    }

    /// Accumulated rotation in radians.
    pub fn cube_rotation(&self) -> f32 {
        self.cube_rotation
    }

    /// Number of draw calls issued so far.
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Perspective projection for a drawable of the given size. Zero dimensions count as 1.
    pub fn projection(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh_gl(
            self.view.fov_degrees.to_radians(),
            aspect,
            self.view.near,
            self.view.far,
        )
    }

    /// Translate, then rotate about Z, then rotate about Y.
    pub fn model_view(&self) -> Mat4 {
        let rotation = self.cube_rotation;
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.view.distance))
            * Mat4::from_rotation_z(rotation)
            * Mat4::from_rotation_y(rotation * self.view.y_rotation_ratio)
    }

    /// Draws the cube once and advances the rotation by `elapsed_seconds` radians.
    ///
    /// A driver error after the draw is returned before the rotation advances.
    pub fn render_frame<S: Surface>(
        &mut self,
        surface: &S,
        resources: &FrameResources<'_, S>,
        elapsed_seconds: f32,
    ) -> Result<(), PipelineError> {
        let FrameResources {
            program,
            geometry,
            texture,
        } = resources;
        let locations = program.locations();

        surface.clear_color(self.view.clear_color);
        surface.clear_depth(1.0);
        surface.enable_depth_test(DepthFunc::LessOrEqual);
        surface.clear();

        let (width, height) = surface.drawable_size();
        let projection = self.projection(width, height);
        let model_view = self.model_view();

        surface.bind_vertex_array(Some(geometry.vertex_array()));

        surface.bind_buffer(BufferTarget::Array, Some(geometry.position_buffer()));
        surface.vertex_attrib_pointer_f32(
            locations.vertex_position,
            POSITION_COMPONENTS,
            false,
            0,
            0,
        );
        surface.enable_vertex_attrib_array(locations.vertex_position);

        surface.bind_buffer(BufferTarget::Array, Some(geometry.tex_coord_buffer()));
        surface.vertex_attrib_pointer_f32(
            locations.texture_coord,
            TEX_COORD_COMPONENTS,
            false,
            0,
            0,
        );
        surface.enable_vertex_attrib_array(locations.texture_coord);

        surface.bind_buffer(BufferTarget::ElementArray, Some(geometry.index_buffer()));

        program.use_program();
        program.set_uniform(&locations.projection_matrix, projection);
        program.set_uniform(&locations.model_view_matrix, model_view);

        texture.bind(0);
        program.set_uniform(&locations.sampler, 0i32);

        surface.draw_triangles_u16(geometry.index_count() as i32, 0);
        self.draw_calls += 1;

        if let Some(code) = surface.take_error() {
            return Err(PipelineError::Driver(code));
        }

        self.cube_rotation += elapsed_seconds;
        Ok(())
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}
