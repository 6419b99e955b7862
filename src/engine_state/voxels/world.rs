//! # World Module
//!
//! This module provides the `WorldGrid` struct which owns every chunk of a bounded
//! voxel world and exposes voxel, light and ray queries in global coordinates.
//!
//! ## Architecture
//!
//! The world is a dense 3D array of chunks stored flat and addressed by chunk index
//! `(y * chunks.z + z) * chunks.x + x`. Chunks hold no pointer back to the world:
//! anything that has to cross a chunk boundary (culling, light propagation, ray
//! traversal) asks the world, which resolves the owning chunk by integer division.
//!
//! ## Bounds Policy
//!
//! Coordinates outside the world never fail. Reads return `None`, `0` or `false`,
//! and writes are ignored. In particular, outside the world is *not* blocking, so
//! the world boundary never produces phantom walls for culling or ray casts.
//!
//! ## Dirty Tracking
//!
//! Every chunk carries a dirty flag and the world keeps an "any chunk dirty" flag
//! that lets the per-frame sweep skip a full scan when nothing changed.

use cgmath::{EuclideanSpace, Point3, Vector3};
use log::{debug, info, trace, warn};

use crate::config::{AtlasConfig, WorldConfig};
use crate::error::WorldError;

use super::block::Voxel;
use super::chunk::{Chunk, ChunkGenerator};
use super::lightmap::LightChannel;
use super::raycast::{self, RayCastResult};

/// Represents a bounded voxel world composed of equally sized chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_light::{Voxel, WorldConfig, WorldGrid};
///
/// let config = WorldConfig {
///     chunks: [2, 1, 2],
///     chunk_size: [4, 4, 4],
///     ..WorldConfig::default()
/// };
/// let mut world = WorldGrid::new(&config).unwrap();
///
/// world.set_voxel(Point3::new(5, 1, 2), Voxel::new(1));
/// assert!(world.is_blocked(Point3::new(5, 1, 2)));
/// assert_eq!(world.get_voxel(Point3::new(-1, 0, 0)), None);
/// ```
pub struct WorldGrid {
    /// Chunks in chunk-index order.
    chunks: Vec<Chunk>,
    /// Number of chunks along each axis.
    chunks_size: Vector3<i32>,
    /// Number of voxels along each axis of a chunk.
    chunk_size: Vector3<i32>,
    /// Physical edge length of one voxel.
    voxel_size: f32,
    /// Texture atlas layout used when meshing.
    atlas: AtlasConfig,
    /// Set whenever any chunk is marked dirty.
    chunks_modified: bool,
}

impl WorldGrid {
    /// Creates a world of air-filled chunks.
    ///
    /// All chunks start dirty so the first rebuild sweep meshes the whole world.
    ///
    /// # Errors
    /// Returns the [`WorldConfig::validate`] error if the shape cannot be built.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let chunks_size = config.chunks_vec();
        let chunk_size = config.chunk_size_vec();
        let count = (chunks_size.x * chunks_size.y * chunks_size.z) as usize;

        let mut chunks = Vec::with_capacity(count);
        for y in 0..chunks_size.y {
            for z in 0..chunks_size.z {
                for x in 0..chunks_size.x {
                    chunks.push(Chunk::new(Point3::new(x, y, z), chunk_size));
                }
            }
        }

        info!(
            "Created world of {}x{}x{} chunks, {}x{}x{} voxels each",
            chunks_size.x, chunks_size.y, chunks_size.z, chunk_size.x, chunk_size.y, chunk_size.z
        );

        Ok(WorldGrid {
            chunks,
            chunks_size,
            chunk_size,
            voxel_size: config.voxel_size,
            atlas: config.atlas,
            chunks_modified: true,
        })
    }

    /// Overwrites every voxel with the generator's output and marks all chunks dirty.
    pub fn generate(&mut self, generator: &dyn ChunkGenerator) {
        for chunk in &mut self.chunks {
            chunk.fill_from(generator);
        }
        self.chunks_modified = true;
        debug!("Generated {} chunks", self.chunks.len());
    }

    /// Number of chunks along each axis.
    pub fn chunks_size(&self) -> Vector3<i32> {
        self.chunks_size
    }

    /// Number of voxels along each axis of a chunk.
    pub fn chunk_size(&self) -> Vector3<i32> {
        self.chunk_size
    }

    /// Number of voxels along each axis of the whole world.
    pub fn extent(&self) -> Vector3<i32> {
        Vector3::new(
            self.chunks_size.x * self.chunk_size.x,
            self.chunks_size.y * self.chunk_size.y,
            self.chunks_size.z * self.chunk_size.z,
        )
    }

    /// Physical edge length of one voxel.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Texture atlas layout.
    pub fn atlas(&self) -> &AtlasConfig {
        &self.atlas
    }

    /// All chunks in chunk-index order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Whether any chunk has been marked dirty since the last sweep.
    pub fn is_modified(&self) -> bool {
        self.chunks_modified
    }

    /// Whether the chunk coordinates fall inside the world.
    pub fn contains_chunk(&self, chunk_coords: Point3<i32>) -> bool {
        chunk_coords.x >= 0
            && chunk_coords.x < self.chunks_size.x
            && chunk_coords.y >= 0
            && chunk_coords.y < self.chunks_size.y
            && chunk_coords.z >= 0
            && chunk_coords.z < self.chunks_size.z
    }

    /// Whether the global voxel coordinates fall inside the world.
    pub fn contains_voxel(&self, voxel_coords: Point3<i32>) -> bool {
        let extent = self.extent();
        voxel_coords.x >= 0
            && voxel_coords.x < extent.x
            && voxel_coords.y >= 0
            && voxel_coords.y < extent.y
            && voxel_coords.z >= 0
            && voxel_coords.z < extent.z
    }

    /// Flat index of a chunk, if it exists.
    pub fn chunk_index(&self, chunk_coords: Point3<i32>) -> Option<usize> {
        if !self.contains_chunk(chunk_coords) {
            return None;
        }
        Some(
            ((chunk_coords.y * self.chunks_size.z + chunk_coords.z) * self.chunks_size.x
                + chunk_coords.x) as usize,
        )
    }

    /// Chunk coordinates owning a global voxel coordinate. Only meaningful in bounds.
    #[inline]
    pub fn chunk_coords_of(&self, voxel_coords: Point3<i32>) -> Point3<i32> {
        Point3::new(
            voxel_coords.x.div_euclid(self.chunk_size.x),
            voxel_coords.y.div_euclid(self.chunk_size.y),
            voxel_coords.z.div_euclid(self.chunk_size.z),
        )
    }

    /// Chunk-local coordinates of a global voxel coordinate.
    #[inline]
    pub fn local_coords_of(&self, voxel_coords: Point3<i32>) -> Point3<i32> {
        Point3::new(
            voxel_coords.x.rem_euclid(self.chunk_size.x),
            voxel_coords.y.rem_euclid(self.chunk_size.y),
            voxel_coords.z.rem_euclid(self.chunk_size.z),
        )
    }

    /// Global voxel coordinates containing a world-space position.
    pub fn voxel_coords_of(&self, position: Point3<f32>) -> Point3<i32> {
        Point3::new(
            (position.x / self.voxel_size).floor() as i32,
            (position.y / self.voxel_size).floor() as i32,
            (position.z / self.voxel_size).floor() as i32,
        )
    }

    /// Gets the chunk at the specified chunk coordinates.
    pub fn get_chunk(&self, chunk_coords: Point3<i32>) -> Option<&Chunk> {
        self.chunk_index(chunk_coords).map(|index| &self.chunks[index])
    }

    /// Gets the chunk owning the specified global voxel coordinates.
    pub fn get_chunk_by_voxel(&self, voxel_coords: Point3<i32>) -> Option<&Chunk> {
        if !self.contains_voxel(voxel_coords) {
            return None;
        }
        self.get_chunk(self.chunk_coords_of(voxel_coords))
    }

    fn locate(&self, voxel_coords: Point3<i32>) -> Option<(usize, Point3<i32>)> {
        if !self.contains_voxel(voxel_coords) {
            return None;
        }
        let index = self.chunk_index(self.chunk_coords_of(voxel_coords))?;
        Some((index, self.local_coords_of(voxel_coords)))
    }

    /// Gets the voxel at global coordinates, `None` outside the world.
    pub fn get_voxel(&self, voxel_coords: Point3<i32>) -> Option<Voxel> {
        let (index, local) = self.locate(voxel_coords)?;
        self.chunks[index].get_voxel(local).copied()
    }

    /// Gets the voxel containing a world-space position.
    pub fn get_voxel_by_position(&self, position: Point3<f32>) -> Option<Voxel> {
        self.get_voxel(self.voxel_coords_of(position))
    }

    /// Writes a voxel and schedules the affected meshes for rebuild.
    ///
    /// The owning chunk is marked dirty, and so is every axis neighbour whose shared
    /// face the voxel touches, since culling on that side of the boundary depends on
    /// it. Light is left untouched; callers drive the light solvers separately.
    /// Ignored outside the world.
    pub fn set_voxel(&mut self, voxel_coords: Point3<i32>, voxel: Voxel) {
        let Some((index, local)) = self.locate(voxel_coords) else {
            warn!("Ignoring voxel write outside the world at {:?}", voxel_coords);
            return;
        };
        trace!("Set voxel {:?} to {}", voxel_coords, voxel.id);

        self.chunks[index].set_voxel(local, voxel);
        self.chunks[index].mark_dirty();
        self.chunks_modified = true;

        let chunk_coords = self.chunk_coords_of(voxel_coords);
        let boundary_neighbours = [
            (local.x == 0, Vector3::new(-1, 0, 0)),
            (local.x == self.chunk_size.x - 1, Vector3::new(1, 0, 0)),
            (local.y == 0, Vector3::new(0, -1, 0)),
            (local.y == self.chunk_size.y - 1, Vector3::new(0, 1, 0)),
            (local.z == 0, Vector3::new(0, 0, -1)),
            (local.z == self.chunk_size.z - 1, Vector3::new(0, 0, 1)),
        ];
        for (on_boundary, offset) in boundary_neighbours {
            if on_boundary {
                self.mark_chunk_dirty(chunk_coords + offset);
            }
        }
    }

    /// Writes the voxel containing a world-space position.
    pub fn set_voxel_by_position(&mut self, position: Point3<f32>, voxel: Voxel) {
        self.set_voxel(self.voxel_coords_of(position), voxel);
    }

    /// Whether a solid voxel occupies the coordinates. Outside the world is passable.
    pub fn is_blocked(&self, voxel_coords: Point3<i32>) -> bool {
        self.get_voxel(voxel_coords).is_some_and(|voxel| voxel.is_solid())
    }

    /// Light level of one channel at global coordinates, `0` outside the world.
    pub fn get_light(&self, voxel_coords: Point3<i32>, channel: LightChannel) -> u8 {
        self.locate(voxel_coords)
            .map_or(0, |(index, local)| self.chunks[index].light(local, channel))
    }

    /// Writes one light channel and marks every chunk whose mesh samples this voxel.
    ///
    /// Meshes light a face from the 3x3 plane in front of it, so a light change can
    /// affect any voxel up to one step away on every axis, diagonals included. Each
    /// chunk owning such a voxel is marked dirty. Ignored outside the world.
    pub(crate) fn set_light(&mut self, voxel_coords: Point3<i32>, channel: LightChannel, value: u8) {
        let Some((index, local)) = self.locate(voxel_coords) else {
            return;
        };
        let chunk = &mut self.chunks[index];
        if let Some(light_index) = chunk.index_of(local) {
            chunk.lightmap_mut().set(light_index, channel, value);
        }
        self.mark_light_dirty(voxel_coords);
    }

    /// Marks the chunks whose meshes may sample the light at `voxel_coords`.
    fn mark_light_dirty(&mut self, voxel_coords: Point3<i32>) {
        let chunk_coords = self.chunk_coords_of(voxel_coords);
        let local = self.local_coords_of(voxel_coords);
        let range = |local: i32, size: i32| {
            let low = if local == 0 { -1 } else { 0 };
            let high = if local == size - 1 { 1 } else { 0 };
            low..=high
        };

        for dy in range(local.y, self.chunk_size.y) {
            for dz in range(local.z, self.chunk_size.z) {
                for dx in range(local.x, self.chunk_size.x) {
                    self.mark_chunk_dirty(chunk_coords + Vector3::new(dx, dy, dz));
                }
            }
        }
    }

    /// Schedules a chunk's mesh for rebuild. Ignored for chunks outside the world.
    pub fn mark_chunk_dirty(&mut self, chunk_coords: Point3<i32>) {
        if let Some(index) = self.chunk_index(chunk_coords) {
            self.chunks[index].mark_dirty();
            self.chunks_modified = true;
        }
    }

    /// Clears every dirty flag and returns the coordinates of the chunks that were dirty.
    ///
    /// Returns an empty list without scanning when nothing was modified.
    pub fn take_dirty_chunks(&mut self) -> Vec<Point3<i32>> {
        if !std::mem::replace(&mut self.chunks_modified, false) {
            return Vec::new();
        }
        self.chunks
            .iter_mut()
            .filter_map(|chunk| chunk.take_dirty().then(|| chunk.position()))
            .collect()
    }

    /// Casts a ray through the voxel grid.
    ///
    /// # Arguments
    /// * `origin` - Ray start in world space
    /// * `direction` - Ray direction; normalized internally
    /// * `max_distance` - Maximum travel, in voxels
    pub fn ray_cast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> RayCastResult {
        raycast::ray_cast(self, origin, direction, max_distance)
    }

    /// Visits every voxel of one chunk in storage order.
    ///
    /// The visitor receives chunk-local coordinates, global coordinates and the voxel.
    /// Does nothing for chunks outside the world.
    pub fn for_each_voxel_in_chunk<F>(&self, chunk_coords: Point3<i32>, mut visitor: F)
    where
        F: FnMut(Point3<i32>, Point3<i32>, Voxel),
    {
        let Some(chunk) = self.get_chunk(chunk_coords) else {
            return;
        };
        let origin = chunk.origin();
        for (local, voxel) in chunk.iter() {
            visitor(local, origin + local.to_vec(), *voxel);
        }
    }

    /// Visits every voxel of the world, Y outermost, then Z, then X.
    pub fn for_each_voxel<F>(&self, mut visitor: F)
    where
        F: FnMut(Point3<i32>, Voxel),
    {
        let extent = self.extent();
        for y in 0..extent.y {
            for z in 0..extent.z {
                for x in 0..extent.x {
                    let coords = Point3::new(x, y, z);
                    if let Some(voxel) = self.get_voxel(coords) {
                        visitor(coords, voxel);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::CheckerboardGenerator;

    fn world() -> WorldGrid {
        let config = WorldConfig {
            chunks: [2, 2, 2],
            chunk_size: [4, 4, 4],
            ..WorldConfig::default()
        };
        let mut world = WorldGrid::new(&config).unwrap();
        world.take_dirty_chunks();
        world
    }

    fn dirty_set(world: &mut WorldGrid) -> Vec<Point3<i32>> {
        let mut dirty = world.take_dirty_chunks();
        dirty.sort_by_key(|p| (p.x, p.y, p.z));
        dirty
    }

    #[test]
    fn new_rejects_bad_shapes() {
        let config = WorldConfig {
            chunk_size: [0, 4, 4],
            ..WorldConfig::default()
        };
        assert!(WorldGrid::new(&config).is_err());
    }

    #[test]
    fn coordinates_split_into_chunk_and_local() {
        let world = world();
        let global = Point3::new(5, 2, 7);
        assert_eq!(world.chunk_coords_of(global), Point3::new(1, 0, 1));
        assert_eq!(world.local_coords_of(global), Point3::new(1, 2, 3));
        assert_eq!(world.extent(), Vector3::new(8, 8, 8));
    }

    #[test]
    fn out_of_bounds_reads_are_safe_defaults() {
        let world = world();
        for coords in [
            Point3::new(-1, 0, 0),
            Point3::new(8, 0, 0),
            Point3::new(0, 8, 0),
            Point3::new(0, 0, -3),
        ] {
            assert_eq!(world.get_voxel(coords), None);
            assert!(!world.is_blocked(coords));
            assert_eq!(world.get_light(coords, LightChannel::Sky), 0);
            assert!(world.get_chunk_by_voxel(coords).is_none());
        }
    }

    #[test]
    fn out_of_bounds_write_is_ignored() {
        let mut world = world();
        world.set_voxel(Point3::new(-1, 0, 0), Voxel::new(1));
        assert!(!world.is_modified());
        assert!(world.take_dirty_chunks().is_empty());
    }

    #[test]
    fn interior_edit_marks_only_owner() {
        let mut world = world();
        world.set_voxel(Point3::new(1, 1, 1), Voxel::new(1));
        assert_eq!(dirty_set(&mut world), vec![Point3::new(0, 0, 0)]);
    }

    #[test]
    fn low_x_boundary_edit_marks_neighbour() {
        let mut world = world();
        world.set_voxel(Point3::new(4, 1, 1), Voxel::new(1));
        assert_eq!(
            dirty_set(&mut world),
            vec![Point3::new(0, 0, 0), Point3::new(1, 0, 0)]
        );
    }

    #[test]
    fn corner_edit_marks_three_axis_neighbours() {
        let mut world = world();
        world.set_voxel(Point3::new(3, 3, 3), Voxel::new(1));
        assert_eq!(
            dirty_set(&mut world),
            vec![
                Point3::new(0, 0, 0),
                Point3::new(0, 0, 1),
                Point3::new(0, 1, 0),
                Point3::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn light_write_marks_diagonal_neighbours() {
        let mut world = world();
        world.set_light(Point3::new(3, 3, 1), LightChannel::Red, 9);
        assert_eq!(world.get_light(Point3::new(3, 3, 1), LightChannel::Red), 9);
        assert_eq!(
            dirty_set(&mut world),
            vec![
                Point3::new(0, 0, 0),
                Point3::new(0, 1, 0),
                Point3::new(1, 0, 0),
                Point3::new(1, 1, 0),
            ]
        );
    }

    #[test]
    fn take_dirty_clears_flags() {
        let mut world = world();
        world.set_voxel(Point3::new(1, 1, 1), Voxel::new(1));
        assert!(world.is_modified());
        assert_eq!(world.take_dirty_chunks().len(), 1);
        assert!(!world.is_modified());
        assert!(world.chunks().iter().all(|chunk| !chunk.is_dirty()));
        assert!(world.take_dirty_chunks().is_empty());
    }

    #[test]
    fn for_each_voxel_in_chunk_reports_global_coordinates() {
        let mut world = world();
        world.generate(&CheckerboardGenerator);
        let mut visited = Vec::new();
        world.for_each_voxel_in_chunk(Point3::new(1, 0, 0), |local, global, voxel| {
            assert_eq!(global, local + Vector3::new(4, 0, 0));
            assert_eq!(Some(voxel), world.get_voxel(global));
            visited.push(global);
        });
        assert_eq!(visited.len(), 64);
        assert_eq!(visited[0], Point3::new(4, 0, 0));
        assert_eq!(visited[1], Point3::new(5, 0, 0));
        assert_eq!(visited[4], Point3::new(4, 0, 1));
    }

    #[test]
    fn position_lookup_respects_voxel_size() {
        let config = WorldConfig {
            chunks: [1, 1, 1],
            chunk_size: [4, 4, 4],
            voxel_size: 0.5,
            ..WorldConfig::default()
        };
        let mut world = WorldGrid::new(&config).unwrap();
        world.set_voxel_by_position(Point3::new(1.2, 0.1, 0.7), Voxel::new(4));
        assert_eq!(world.get_voxel(Point3::new(2, 0, 1)), Some(Voxel::new(4)));
        assert_eq!(
            world.get_voxel_by_position(Point3::new(1.01, 0.4, 0.5)),
            Some(Voxel::new(4))
        );
    }
}
