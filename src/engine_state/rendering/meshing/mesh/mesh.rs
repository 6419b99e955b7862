//! Mesh data structures for voxel rendering.
//!
//! A [`ChunkMesh`] is the complete geometry of one chunk: a flat vertex list and a
//! triangle index list. Meshes are rebuilt from scratch and replace the previous
//! one; nothing is ever appended to an uploaded mesh.

use crate::engine_state::rendering::vertex::VoxelVertex;

/// Index pattern splitting a quad into two triangles: (0, 1, 3) and (1, 2, 3).
const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Vertex and index data for one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    /// The vertex data, four per face
    pub vertices: Vec<VoxelVertex>,
    /// The index data, six per face
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one quad.
    pub fn push_quad(&mut self, quad: [VoxelVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        self.vertices.extend_from_slice(&quad);
    }

    /// Number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
