//! # Chunk Iteration Module
//!
//! This module provides an iterator over every voxel of a chunk, air included, in
//! storage order: X fastest, then Z, then Y.
//!
//! The order is load-bearing for reproducibility. World generation and mesh
//! building both walk chunks with this iterator, so two runs over the same world
//! produce voxels and vertices in the same sequence.

use cgmath::Point3;

use crate::engine_state::voxels::block::Voxel;

use super::Chunk;

/// An iterator over all voxels in a chunk together with their local coordinates.
///
/// The iterator tracks the local position incrementally instead of dividing the
/// storage index on every step.
pub struct ChunkVoxelIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next position in the voxel array
    offset: usize,
    /// Local position of the voxel at `offset`
    local: Point3<i32>,
}

impl<'a> ChunkVoxelIterator<'a> {
    /// Creates a new `ChunkVoxelIterator` positioned at local `(0, 0, 0)`.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkVoxelIterator {
            chunk_ref,
            offset: 0,
            local: Point3::new(0, 0, 0),
        }
    }
}

impl<'a> Iterator for ChunkVoxelIterator<'a> {
    type Item = (Point3<i32>, &'a Voxel);

    fn next(&mut self) -> Option<Self::Item> {
        let voxel = self.chunk_ref.voxels.get(self.offset)?;
        let position = self.local;

        let size = self.chunk_ref.size;
        self.offset += 1;
        self.local.x += 1;
        // End of row: wrap X and advance Z
        if self.local.x == size.x {
            self.local.x = 0;
            self.local.z += 1;
            // End of plane: wrap Z and advance Y
            if self.local.z == size.z {
                self.local.z = 0;
                self.local.y += 1;
            }
        }

        Some((position, voxel))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chunk_ref.voxels.len() - self.offset;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkVoxelIterator<'_> {}
