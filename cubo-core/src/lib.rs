//! The core of the cubo demos: a minimal immediate-mode pipeline that draws one textured,
//! spinning cube.
//!
//! The pieces, leaf to root:
//!
//! - [`shader`] compiles and links the vertex/fragment pair and caches its locations.
//! - [`geometry`] uploads a [`Mesh`] into static GPU buffers.
//! - [`texture`] hands out a placeholder texture and swaps in the decoded image later.
//! - [`renderer`] draws a frame and advances the rotation.
//! - [`render_loop`] feeds host animation ticks into the [`Pipeline`].
//!
//! Everything renders through the [`Surface`] trait; [`GlowSurface`] is the OpenGL backend.

pub mod error;
pub mod geometry;
pub mod mesh;
pub mod pipeline;
pub mod render_loop;
pub mod renderer;
pub mod shader;
pub mod surface;
pub mod texture;

pub use error::{CompileStage, PipelineError};
pub use mesh::{Mesh, MeshError};
pub use pipeline::{Pipeline, PipelineConfig};
pub use render_loop::{AnimationDriver, RenderLoop};
pub use renderer::{FrameRenderer, ViewConfig};
pub use surface::{GlowSurface, Surface};
pub use texture::TextureSource;
