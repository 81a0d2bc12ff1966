//! The assembled pipeline: program, geometry and texture plus the renderer that draws them.

use std::{borrow::Cow, sync::Arc};

use crate::{
    error::PipelineError,
    geometry::GeometryBuffer,
    mesh::Mesh,
    renderer::{FrameRenderer, FrameResources, ViewConfig},
    shader::{ShaderProgram, TEXTURED_FRAGMENT_SOURCE, TEXTURED_VERTEX_SOURCE, compile_program},
    surface::Surface,
    texture::{Texture, TextureLoader, TextureSource},
};

/// Everything that distinguishes one demo from another.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub vertex_source: Cow<'static, str>,
    pub fragment_source: Cow<'static, str>,
    pub mesh: Mesh,
    pub texture: TextureSource,
    pub view: ViewConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vertex_source: Cow::Borrowed(TEXTURED_VERTEX_SOURCE),
            fragment_source: Cow::Borrowed(TEXTURED_FRAGMENT_SOURCE),
            mesh: Mesh::cube(),
            texture: TextureSource::default(),
            view: ViewConfig::default(),
        }
    }
}

/// Owns the GPU resources of one demo and draws them frame by frame.
pub struct Pipeline<S: Surface> {
    surface: Arc<S>,
    program: ShaderProgram<S>,
    geometry: GeometryBuffer<S>,
    texture: Texture<S>,
    renderer: FrameRenderer,
}

impl<S: Surface> Pipeline<S> {
    /// Compiles the program, uploads the mesh and starts loading the texture.
    pub fn new(surface: &Arc<S>, config: &PipelineConfig) -> Result<Self, PipelineError> {
        let program = compile_program(surface, &config.vertex_source, &config.fragment_source)?;
        let geometry = GeometryBuffer::build(surface, &config.mesh)?;
        let texture = TextureLoader::load(surface, &config.texture)?;

        Ok(Self {
            surface: Arc::clone(surface),
            program,
            geometry,
            texture,
            renderer: FrameRenderer::new(config.view),
        })
    }

    /// Installs the texture image if it has arrived, then draws one frame.
    pub fn render_frame(&mut self, elapsed_seconds: f32) -> Result<(), PipelineError> {
        self.texture.poll();

        let resources = FrameResources {
            program: &self.program,
            geometry: &self.geometry,
            texture: &self.texture,
        };
        self.renderer
            .render_frame(self.surface.as_ref(), &resources, elapsed_seconds)
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn texture(&self) -> &Texture<S> {
        &self.texture
    }
}
