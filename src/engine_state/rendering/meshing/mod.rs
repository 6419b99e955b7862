//! Mesh generation and hand-off for voxel rendering.
//!
//! This module turns chunks into face geometry and passes it to whatever renders it.
//!
//! # Architecture
//! - [`ChunkMesher`]: Rebuilds one chunk's mesh from the world
//! - [`GeometrySink`]: The renderer-side consumer of finished meshes
//! - [`MeshCache`]: A sink that keeps the latest mesh of every chunk
//! - `mesh/`: Faces, per-corner light and the mesh container
//!
//! # Culling
//! A face is emitted only if the voxel on its other side is not blocking. That
//! neighbour is looked up in global coordinates through the world, so faces on
//! chunk boundaries are culled against the neighbouring chunk. Outside the world
//! counts as open, so the outer shell of the world is always meshed.
//!
//! # Rebuild Policy
//! Meshes are always rebuilt whole; there is no incremental update. The sweep
//! takes the dirty set from the world (clearing it) and rebuilds exactly those chunks.

use std::collections::HashMap;

use cgmath::Point3;
use log::debug;

mod mesh;

pub use mesh::*;

use crate::config::SmoothLighting;
use crate::engine_state::{
    rendering::atlas::TextureAtlas,
    voxels::{block::block_side::BlockSide, world::WorldGrid},
};

/// Receives rebuilt chunk meshes.
///
/// A new mesh for a chunk replaces whatever the sink held for it before.
pub trait GeometrySink {
    /// Takes ownership of the new geometry of the chunk at `chunk_coords`.
    fn upload(&mut self, chunk_coords: Point3<i32>, mesh: ChunkMesh);
}

/// Keeps the most recent mesh of each chunk in memory.
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: HashMap<Point3<i32>, ChunkMesh>,
    uploads: usize,
}

impl MeshCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest mesh of a chunk, if one was uploaded.
    pub fn get(&self, chunk_coords: Point3<i32>) -> Option<&ChunkMesh> {
        self.meshes.get(&chunk_coords)
    }

    /// Number of chunks with a mesh.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether no mesh was ever uploaded.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total number of uploads received, replacements included.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Sum of faces over all cached meshes.
    pub fn total_faces(&self) -> usize {
        self.meshes.values().map(ChunkMesh::face_count).sum()
    }
}

impl GeometrySink for MeshCache {
    fn upload(&mut self, chunk_coords: Point3<i32>, mesh: ChunkMesh) {
        self.uploads += 1;
        self.meshes.insert(chunk_coords, mesh);
    }
}

/// Builds chunk meshes with smooth per-corner lighting.
#[derive(Debug, Clone, Default)]
pub struct ChunkMesher {
    smoothing: SmoothLighting,
}

impl ChunkMesher {
    /// Creates a mesher using the given light smoothing weights.
    pub fn new(smoothing: SmoothLighting) -> Self {
        ChunkMesher { smoothing }
    }

    /// Builds the mesh of one chunk from scratch.
    ///
    /// Returns an empty mesh for chunk coordinates outside the world.
    ///
    /// # Arguments
    /// * `world` - The world holding the chunk and its neighbours
    /// * `atlas` - Texture lookup for voxel faces
    /// * `chunk_coords` - Which chunk to mesh
    pub fn create(
        &self,
        world: &WorldGrid,
        atlas: &dyn TextureAtlas,
        chunk_coords: Point3<i32>,
    ) -> ChunkMesh {
        let voxel_size = world.voxel_size();
        let mut mesh = ChunkMesh::new();

        world.for_each_voxel_in_chunk(chunk_coords, |local, global, voxel| {
            if !voxel.is_solid() {
                return;
            }

            for side in BlockSide::all() {
                if world.is_blocked(global + side.normal()) {
                    continue;
                }

                let face = Face::new(local, voxel_size, voxel, side);
                let light = FaceLight::sample(world, global, side, &self.smoothing);
                mesh.push_quad(face.vertices(atlas.uv_rect(voxel, side), &light));
            }
        });

        debug!(
            "Meshed chunk {:?}: {} faces",
            chunk_coords,
            mesh.face_count()
        );
        mesh
    }

    /// Rebuilds every dirty chunk and uploads the results, clearing the dirty set.
    ///
    /// Returns the number of chunks rebuilt.
    pub fn rebuild_dirty(
        &self,
        world: &mut WorldGrid,
        atlas: &dyn TextureAtlas,
        sink: &mut dyn GeometrySink,
    ) -> usize {
        let dirty = world.take_dirty_chunks();
        for &chunk_coords in &dirty {
            let mesh = self.create(world, atlas, chunk_coords);
            sink.upload(chunk_coords, mesh);
        }
        dirty.len()
    }
}
