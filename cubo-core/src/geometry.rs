//! GPU geometry buffers.
//!
//! This module defines the [`GeometryBuffer`] struct, which owns the static position,
//! texture-coordinate and index buffers uploaded from a [`Mesh`].

use std::sync::Arc;

use crate::{
    error::PipelineError,
    mesh::Mesh,
    surface::{BufferTarget, Surface},
};

/// Floats per vertex in the position buffer.
pub const POSITION_COMPONENTS: i32 = 3;
/// Floats per vertex in the texture-coordinate buffer.
pub const TEX_COORD_COMPONENTS: i32 = 2;

/// Represents a mesh uploaded to the GPU. The buffers are written once and never modified.
pub struct GeometryBuffer<S: Surface> {
    surface: Arc<S>,
    vao: S::VertexArray,
    position: S::Buffer,
    tex_coord: S::Buffer,
    index: S::Buffer,
    index_count: usize,
}

impl<S: Surface> GeometryBuffer<S> {
    /// Uploads the mesh into three static buffers.
    pub fn build(surface: &Arc<S>, mesh: &Mesh) -> Result<Self, PipelineError> {
        let vao = surface
            .create_vertex_array()
            .map_err(|e| PipelineError::allocation("vertex array", e))?;
        let mut handles = Vec::with_capacity(3);
        for _ in 0..3 {
            match surface.create_buffer() {
                Ok(buffer) => handles.push(buffer),
                Err(e) => {
                    for buffer in handles {
                        surface.delete_buffer(buffer);
                    }
                    surface.delete_vertex_array(vao);
                    return Err(PipelineError::allocation("buffer", e));
                }
            }
        }
        let [position, tex_coord, index] = [handles[0], handles[1], handles[2]];

        surface.bind_vertex_array(Some(vao));

        surface.bind_buffer(BufferTarget::Array, Some(position));
        surface.buffer_data_static(
            BufferTarget::Array,
            bytemuck::cast_slice(mesh.positions()),
        );

        surface.bind_buffer(BufferTarget::Array, Some(tex_coord));
        surface.buffer_data_static(
            BufferTarget::Array,
            bytemuck::cast_slice(mesh.tex_coords()),
        );

        surface.bind_buffer(BufferTarget::ElementArray, Some(index));
        surface.buffer_data_static(
            BufferTarget::ElementArray,
            bytemuck::cast_slice(mesh.indices()),
        );

        surface.bind_vertex_array(None);
        surface.bind_buffer(BufferTarget::Array, None);

        log::debug!(
            "Uploaded geometry: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );

        Ok(Self {
            surface: Arc::clone(surface),
            vao,
            position,
            tex_coord,
            index,
            index_count: mesh.index_count(),
        })
    }

    pub fn vertex_array(&self) -> S::VertexArray {
        self.vao
    }

    pub fn position_buffer(&self) -> S::Buffer {
        self.position
    }

    pub fn tex_coord_buffer(&self) -> S::Buffer {
        self.tex_coord
    }

    pub fn index_buffer(&self) -> S::Buffer {
        self.index
    }

    /// Returns the amount of indices used in the mesh.
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

impl<S: Surface> Drop for GeometryBuffer<S> {
    fn drop(&mut self) {
        self.surface.delete_buffer(self.position);
        self.surface.delete_buffer(self.tex_coord);
        self.surface.delete_buffer(self.index);
        self.surface.delete_vertex_array(self.vao);
    }
}
