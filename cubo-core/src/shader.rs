//! Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for compiling and linking
//! the pipeline's vertex/fragment pair, and the [`Uniform`] trait for setting uniform
//! variables through cached locations.

use std::sync::Arc;

use glam::Mat4;

use crate::{
    error::{CompileStage, PipelineError},
    surface::{ShaderStage, Surface},
};

/// Vertex attribute holding the object-space position.
pub const ATTRIB_VERTEX_POSITION: &str = "aVertexPosition";
/// Vertex attribute holding the texture coordinate.
pub const ATTRIB_TEXTURE_COORD: &str = "aTextureCoord";
pub const UNIFORM_PROJECTION_MATRIX: &str = "uProjectionMatrix";
pub const UNIFORM_MODEL_VIEW_MATRIX: &str = "uModelViewMatrix";
pub const UNIFORM_SAMPLER: &str = "uSampler";

/// Vertex stage of the textured cube program.
pub const TEXTURED_VERTEX_SOURCE: &str = include_str!("shaders/textured/vert.glsl");
/// Fragment stage of the textured cube program.
pub const TEXTURED_FRAGMENT_SOURCE: &str = include_str!("shaders/textured/frag.glsl");

impl From<ShaderStage> for CompileStage {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => CompileStage::Vertex,
            ShaderStage::Fragment => CompileStage::Fragment,
        }
    }
}

/// Represents an individual compiled shader. The shader object is released on drop.
pub struct Shader<S: Surface> {
    surface: Arc<S>,
    id: S::Shader,
}

impl<S: Surface> Shader<S> {
    /// Compiles a new shader from the given source code.
    pub fn new(surface: &Arc<S>, stage: ShaderStage, source: &str) -> Result<Self, PipelineError> {
        let id = surface
            .create_shader(stage)
            .map_err(|e| PipelineError::allocation("shader", e))?;
        let shader = Self {
            surface: Arc::clone(surface),
            id,
        };

        surface.shader_source(id, source);
        surface.compile_shader(id);

        if !surface.shader_compile_status(id) {
            return Err(PipelineError::Compile {
                stage: stage.into(),
                log: surface.shader_info_log(id),
            });
        }

        Ok(shader)
    }
}

impl<S: Surface> Drop for Shader<S> {
    fn drop(&mut self) {
        self.surface.delete_shader(self.id);
    }
}

/// Locations resolved once after linking and reused every frame.
#[derive(Debug)]
pub struct ProgramLocations<L> {
    pub vertex_position: u32,
    pub texture_coord: u32,
    pub projection_matrix: L,
    pub model_view_matrix: L,
    pub sampler: L,
}

/// Represents a linked program together with its cached attribute and uniform locations.
pub struct ShaderProgram<S: Surface> {
    surface: Arc<S>,
    id: S::Program,
    locations: ProgramLocations<S::UniformLocation>,
}

impl<S: Surface> ShaderProgram<S> {
    /// Links a new program from a compiled vertex and fragment shader.
    pub fn link(
        surface: &Arc<S>,
        vertex: &Shader<S>,
        fragment: &Shader<S>,
    ) -> Result<Self, PipelineError> {
        let id = surface
            .create_program()
            .map_err(|e| PipelineError::allocation("program", e))?;

        for shader in [vertex, fragment] {
            surface.attach_shader(id, shader.id);
        }

        surface.link_program(id);

        if !surface.program_link_status(id) {
            let log = surface.program_info_log(id);
            surface.delete_program(id);
            return Err(PipelineError::Compile {
                stage: CompileStage::Link,
                log,
            });
        }

        for shader in [vertex, fragment] {
            surface.detach_shader(id, shader.id);
        }

        let locations = match resolve_locations(surface.as_ref(), id) {
            Ok(locations) => locations,
            Err(e) => {
                surface.delete_program(id);
                return Err(e);
            }
        };

        Ok(Self {
            surface: Arc::clone(surface),
            id,
            locations,
        })
    }

    /// Binds the program for use.
    pub fn use_program(&self) {
        self.surface.use_program(Some(self.id));
    }

    pub fn locations(&self) -> &ProgramLocations<S::UniformLocation> {
        &self.locations
    }

    /// Sets a uniform through a cached location. The program must be in use.
    pub fn set_uniform<T: Uniform>(&self, location: &S::UniformLocation, value: T) {
        value.set_uniform(self.surface.as_ref(), location);
    }
}

impl<S: Surface> Drop for ShaderProgram<S> {
    fn drop(&mut self) {
        self.surface.delete_program(self.id);
    }
}

fn resolve_locations<S: Surface>(
    surface: &S,
    program: S::Program,
) -> Result<ProgramLocations<S::UniformLocation>, PipelineError> {
    let attrib = |name: &'static str| {
        surface
            .attrib_location(program, name)
            .ok_or(PipelineError::MissingBinding { name })
    };
    let uniform = |name: &'static str| {
        surface
            .uniform_location(program, name)
            .ok_or(PipelineError::MissingBinding { name })
    };

    Ok(ProgramLocations {
        vertex_position: attrib(ATTRIB_VERTEX_POSITION)?,
        texture_coord: attrib(ATTRIB_TEXTURE_COORD)?,
        projection_matrix: uniform(UNIFORM_PROJECTION_MATRIX)?,
        model_view_matrix: uniform(UNIFORM_MODEL_VIEW_MATRIX)?,
        sampler: uniform(UNIFORM_SAMPLER)?,
    })
}

/// Compiles both stages and links them into a program.
///
/// Nothing is retried. On failure every shader object created for the attempt has been
/// released by the time this returns.
pub fn compile_program<S: Surface>(
    surface: &Arc<S>,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ShaderProgram<S>, PipelineError> {
    let vertex = Shader::new(surface, ShaderStage::Vertex, vertex_source)?;
    let fragment = Shader::new(surface, ShaderStage::Fragment, fragment_source)?;
    let program = ShaderProgram::link(surface, &vertex, &fragment)?;
    log::info!("Linked shader program");
    Ok(program)
}

/// A value that can be written to a uniform location.
pub trait Uniform {
    fn set_uniform<S: Surface>(&self, surface: &S, location: &S::UniformLocation);
}

impl Uniform for i32 {
    fn set_uniform<S: Surface>(&self, surface: &S, location: &S::UniformLocation) {
        surface.uniform_i32(location, *self);
    }
}

impl Uniform for Mat4 {
    fn set_uniform<S: Surface>(&self, surface: &S, location: &S::UniformLocation) {
        surface.uniform_matrix_4(location, &self.to_cols_array());
    }
}
