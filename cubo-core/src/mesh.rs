//! CPU-side mesh data.
//!
//! A [`Mesh`] is a list of positions, a matching list of texture coordinates and a list of
//! 16-bit triangle indices into them. [`Mesh::cube`] builds the textured cube the pipeline
//! renders by default.

/// Reasons a [`Mesh`] can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("{tex_coords} texture coordinates for {positions} positions")]
    TexCoordCount { positions: usize, tex_coords: usize },

    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("index {index} at position {at} is out of range for {positions} vertices")]
    IndexOutOfRange {
        at: usize,
        index: u16,
        positions: usize,
    },

    #[error("{0} vertices cannot be addressed with 16-bit indices")]
    TooManyVertices(usize),
}

/// Indexed triangle mesh with one texture coordinate per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    indices: Vec<u16>,
}

/// Corners of each cube face, wound counter-clockwise when seen from outside.
/// Order: front, back, top, bottom, right, left.
const CUBE_FACES: [[[f32; 3]; 4]; 6] = [
    [
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ],
    [
        [-1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ],
    [
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
    ],
    [
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [-1.0, -1.0, 1.0],
    ],
    [
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [1.0, -1.0, 1.0],
    ],
    [
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
    ],
];

const FACE_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

impl Mesh {
    /// Creates a mesh after checking that every index points at a vertex and every vertex has
    /// a texture coordinate.
    pub fn new(
        positions: Vec<[f32; 3]>,
        tex_coords: Vec<[f32; 2]>,
        indices: Vec<u16>,
    ) -> Result<Self, MeshError> {
        if positions.len() != tex_coords.len() {
            return Err(MeshError::TexCoordCount {
                positions: positions.len(),
                tex_coords: tex_coords.len(),
            });
        }
        if positions.len() > u16::MAX as usize + 1 {
            return Err(MeshError::TooManyVertices(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(indices.len()));
        }
        if let Some((at, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= positions.len())
        {
            return Err(MeshError::IndexOutOfRange {
                at,
                index,
                positions: positions.len(),
            });
        }

        Ok(Self {
            positions,
            tex_coords,
            indices,
        })
    }

    /// The 2×2×2 cube centered on the origin: 24 vertices (4 per face), 36 indices.
    /// Each face maps the whole texture.
    pub fn cube() -> Self {
        let mut positions = Vec::with_capacity(24);
        let mut tex_coords = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, corners) in CUBE_FACES.iter().enumerate() {
            let base = (face * 4) as u16;
            positions.extend_from_slice(corners);
            tex_coords.extend_from_slice(&FACE_TEX_COORDS);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            positions,
            tex_coords,
            indices,
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterates over the triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|triangle| [triangle[0], triangle[1], triangle[2]])
    }
}
