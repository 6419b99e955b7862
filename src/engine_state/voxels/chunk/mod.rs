//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size dense block of voxels with a
//! co-located lightmap and a dirty flag that schedules its mesh for rebuild.
//!
//! ## Storage Layout
//!
//! Voxels are stored in one flat array linearized as `(y * size.z + z) * size.x + x`,
//! so X varies fastest, then Z, then Y. The lightmap uses the same index, and
//! [`ChunkVoxelIterator`] visits voxels in exactly this order.
//!
//! ## Ownership
//!
//! A chunk knows nothing about its neighbours. Anything that has to look across a
//! chunk boundary goes through the owning [`WorldGrid`](super::world::WorldGrid),
//! which is also the only code allowed to mutate voxels, light or the dirty flag.

use cgmath::{Point3, Vector3};

use super::block::Voxel;
use super::lightmap::{LightChannel, Lightmap};

mod chunk_creation;
pub mod chunk_iteration;

pub use chunk_creation::{
    generator_for, ChunkGenerator, CheckerboardGenerator, EmptyGenerator, PerlinTerrain,
    ScatterGenerator, SolidGenerator,
};
pub use chunk_iteration::ChunkVoxelIterator;

/// A fixed-size cuboid of voxels and their light.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not voxel coordinates).
    position: Point3<i32>,

    /// Number of voxels along each axis.
    size: Vector3<i32>,

    /// Voxel identifiers in linearized order.
    voxels: Vec<Voxel>,

    /// Light levels, indexed like `voxels`.
    lightmap: Lightmap,

    /// Set when voxels or light changed since the last mesh rebuild.
    dirty: bool,
}

impl Chunk {
    /// Creates a chunk filled with air and no light.
    ///
    /// New chunks start dirty so that the first rebuild sweep meshes them.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `size` - Voxels per axis; every component must be positive
    pub fn new(position: Point3<i32>, size: Vector3<i32>) -> Self {
        let len = (size.x * size.y * size.z) as usize;
        Chunk {
            position,
            size,
            voxels: vec![Voxel::AIR; len],
            lightmap: Lightmap::new(len),
            dirty: true,
        }
    }

    /// The chunk coordinates of this chunk.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Voxels per axis.
    pub fn size(&self) -> Vector3<i32> {
        self.size
    }

    /// Total number of voxels.
    pub fn volume(&self) -> usize {
        self.voxels.len()
    }

    /// Global voxel coordinates of this chunk's local origin.
    pub fn origin(&self) -> Point3<i32> {
        Point3::new(
            self.position.x * self.size.x,
            self.position.y * self.size.y,
            self.position.z * self.size.z,
        )
    }

    /// Whether the local coordinates fall inside this chunk.
    #[inline]
    pub fn contains(&self, local: Point3<i32>) -> bool {
        local.x >= 0
            && local.x < self.size.x
            && local.y >= 0
            && local.y < self.size.y
            && local.z >= 0
            && local.z < self.size.z
    }

    /// Linear storage index of the local coordinates, if inside the chunk.
    #[inline]
    pub fn index_of(&self, local: Point3<i32>) -> Option<usize> {
        if !self.contains(local) {
            return None;
        }
        Some(((local.y * self.size.z + local.z) * self.size.x + local.x) as usize)
    }

    /// Local coordinates of a linear storage index.
    #[inline]
    pub fn local_of(&self, index: usize) -> Point3<i32> {
        let index = index as i32;
        let x = index % self.size.x;
        let z = (index / self.size.x) % self.size.z;
        let y = index / (self.size.x * self.size.z);
        Point3::new(x, y, z)
    }

    /// Gets the voxel at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// `None` if the coordinates are outside the chunk.
    pub fn get_voxel(&self, local: Point3<i32>) -> Option<&Voxel> {
        self.index_of(local).map(|index| &self.voxels[index])
    }

    /// Whether a solid voxel occupies the local coordinates. Outside the chunk is not solid.
    pub fn is_blocked(&self, local: Point3<i32>) -> bool {
        self.get_voxel(local).is_some_and(Voxel::is_solid)
    }

    /// Light level of one channel at the local coordinates, `0` outside the chunk.
    pub fn light(&self, local: Point3<i32>, channel: LightChannel) -> u8 {
        self.index_of(local)
            .map_or(0, |index| self.lightmap.get(index, channel))
    }

    /// Read access to the lightmap.
    pub fn lightmap(&self) -> &Lightmap {
        &self.lightmap
    }

    /// Whether the chunk's mesh is out of date.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Iterates every voxel in storage order with its local coordinates.
    pub fn iter(&self) -> ChunkVoxelIterator<'_> {
        ChunkVoxelIterator::new(self)
    }

    /// All voxels in storage order.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Overwrites the voxel at the local coordinates. No-op outside the chunk.
    pub(in crate::engine_state::voxels) fn set_voxel(&mut self, local: Point3<i32>, voxel: Voxel) {
        if let Some(index) = self.index_of(local) {
            self.voxels[index] = voxel;
        }
    }

    pub(in crate::engine_state::voxels) fn lightmap_mut(&mut self) -> &mut Lightmap {
        &mut self.lightmap
    }

    pub(in crate::engine_state::voxels) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the dirty flag, returning whether it was set.
    pub(in crate::engine_state::voxels) fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> Chunk {
        Chunk::new(Point3::new(1, 0, 2), Vector3::new(4, 3, 5))
    }

    #[test]
    fn linearization_is_x_then_z_then_y() {
        let chunk = chunk();
        assert_eq!(chunk.index_of(Point3::new(0, 0, 0)), Some(0));
        assert_eq!(chunk.index_of(Point3::new(1, 0, 0)), Some(1));
        assert_eq!(chunk.index_of(Point3::new(0, 0, 1)), Some(4));
        assert_eq!(chunk.index_of(Point3::new(0, 1, 0)), Some(20));
        assert_eq!(chunk.index_of(Point3::new(3, 2, 4)), Some(chunk.volume() - 1));
        assert_eq!(chunk.index_of(Point3::new(4, 0, 0)), None);
        assert_eq!(chunk.index_of(Point3::new(0, -1, 0)), None);
    }

    #[test]
    fn local_of_inverts_index_of() {
        let chunk = chunk();
        for index in 0..chunk.volume() {
            assert_eq!(chunk.index_of(chunk.local_of(index)), Some(index));
        }
    }

    #[test]
    fn origin_scales_position() {
        assert_eq!(chunk().origin(), Point3::new(4, 0, 10));
    }

    #[test]
    fn set_and_get_voxel() {
        let mut chunk = chunk();
        let local = Point3::new(2, 1, 3);
        assert!(!chunk.is_blocked(local));
        chunk.set_voxel(local, Voxel::new(7));
        assert_eq!(chunk.get_voxel(local), Some(&Voxel::new(7)));
        assert!(chunk.is_blocked(local));

        chunk.set_voxel(Point3::new(9, 9, 9), Voxel::new(1));
        assert_eq!(chunk.get_voxel(Point3::new(9, 9, 9)), None);
        assert!(!chunk.is_blocked(Point3::new(9, 9, 9)));
    }

    #[test]
    fn dirty_flag_is_taken_once() {
        let mut chunk = chunk();
        assert!(chunk.take_dirty());
        assert!(!chunk.is_dirty());
        assert!(!chunk.take_dirty());
        chunk.mark_dirty();
        assert!(chunk.is_dirty());
    }
}
