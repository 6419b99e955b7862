//! # Engine State Module
//!
//! The core engine module that owns the voxel world and drives it one tick at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `lighting` - Flood-fill light solvers and initial light seeding
//! * `rendering` - Chunk meshing, texture atlas lookup and the geometry sink
//! * `voxels` - Voxel data, chunks, world generation and ray casting
//!
//! ## Tick Pipeline
//!
//! Everything runs on the calling thread, in a fixed order:
//!
//! 1. Apply every queued [`VoxelEdit`], repairing light around each one
//! 2. Solve every light channel
//! 3. Rebuild the mesh of every dirty chunk and hand it to the [`GeometrySink`]
//!
//! Ray picking is read-only and can run at any point between ticks.

use std::collections::VecDeque;

use cgmath::{Point3, Vector3};
use log::{info, trace, warn};
use web_time::{Duration, Instant};

use crate::config::WorldConfig;
use crate::error::WorldError;

use lighting::{seed_emitters, seed_sky_light, LightSolver};
use rendering::{ChunkMesher, GeometrySink, StripAtlas, TextureAtlas};
use voxels::{
    block::{block_side::BlockSide, block_type::MAX_LIGHT_LEVEL, Voxel, VoxelId},
    chunk::generator_for,
    lightmap::LightChannel,
    raycast::RayCastResult,
    world::WorldGrid,
};

pub mod lighting;
pub mod rendering;
pub mod voxels;

/// A request to change one voxel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoxelEdit {
    /// Global voxel coordinates
    pub coords: Point3<i32>,
    /// New voxel identifier; `0` breaks the voxel
    pub id: VoxelId,
}

impl VoxelEdit {
    /// Creates an edit setting `coords` to `id`.
    pub fn new(coords: Point3<i32>, id: VoxelId) -> Self {
        VoxelEdit { coords, id }
    }
}

/// What one [`EngineState::tick`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Edits written to the world
    pub edits_applied: usize,
    /// Edits dropped because they fell outside the world
    pub edits_rejected: usize,
    /// Chunks whose mesh was rebuilt and uploaded
    pub chunks_rebuilt: usize,
    /// Time spent in the rebuild sweep
    pub rebuild_time: Duration,
}

/// The main state container for the voxel engine
///
/// Owns the world, one light solver per channel, the pending edit queue and the
/// meshing setup. Every mutation goes through [`EngineState::tick`] or
/// [`EngineState::apply_edit`] so light and meshes stay consistent with voxels.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_light::{EngineState, GenerationMethod, MeshCache, VoxelEdit, WorldConfig};
///
/// let config = WorldConfig {
///     chunks: [2, 1, 2],
///     chunk_size: [4, 4, 4],
///     generation: GenerationMethod::Empty,
///     ..WorldConfig::default()
/// };
/// let mut engine = EngineState::new(&config).unwrap();
/// let mut meshes = MeshCache::new();
///
/// engine.queue_edit(VoxelEdit::new(Point3::new(0, 0, 0), 1));
/// let report = engine.tick(&mut meshes);
/// assert_eq!(report.edits_applied, 1);
/// assert_eq!(meshes.total_faces(), 6);
/// ```
pub struct EngineState {
    /// The voxel world containing all chunk data
    world: WorldGrid,
    /// Red, green and blue solvers, in `LightChannel::RGB` order
    rgb_solvers: [LightSolver; 3],
    /// Sky light solver
    sky_solver: LightSolver,
    /// Edits waiting for the next tick
    pending_edits: VecDeque<VoxelEdit>,
    /// Mesh builder
    mesher: ChunkMesher,
    /// Texture lookup used while meshing
    atlas: Box<dyn TextureAtlas>,
}

impl EngineState {
    /// Creates a generated, fully lit world using the default strip atlas.
    ///
    /// Every chunk starts dirty, so the first tick meshes the whole world.
    ///
    /// # Errors
    /// Returns the configuration error if the world shape is invalid.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        Self::with_atlas(config, Box::new(StripAtlas::new(config.atlas)))
    }

    /// Creates a generated, fully lit world using a custom atlas.
    ///
    /// # Errors
    /// Returns the configuration error if the world shape is invalid.
    pub fn with_atlas(
        config: &WorldConfig,
        atlas: Box<dyn TextureAtlas>,
    ) -> Result<Self, WorldError> {
        let start = Instant::now();
        let mut world = WorldGrid::new(config)?;
        world.generate(generator_for(config).as_ref());

        let capacity = world.chunks().first().map_or(0, |chunk| chunk.volume());
        let mut rgb_solvers = LightChannel::RGB.map(|channel| LightSolver::new(channel, capacity));
        let mut sky_solver = LightSolver::new(LightChannel::Sky, capacity);

        seed_emitters(&mut world, &mut rgb_solvers);
        seed_sky_light(&mut world, &mut sky_solver);

        info!(
            "World ready in {:?} ({:?} generation)",
            start.elapsed(),
            config.generation
        );

        Ok(EngineState {
            world,
            rgb_solvers,
            sky_solver,
            pending_edits: VecDeque::new(),
            mesher: ChunkMesher::new(config.smooth_lighting),
            atlas,
        })
    }

    /// Read access to the world.
    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    /// Buffers an edit for the next tick.
    pub fn queue_edit(&mut self, edit: VoxelEdit) {
        self.pending_edits.push_back(edit);
    }

    /// Number of edits waiting for the next tick.
    pub fn pending_edits(&self) -> usize {
        self.pending_edits.len()
    }

    /// Runs one tick: applies queued edits, solves light, rebuilds dirty meshes.
    pub fn tick(&mut self, sink: &mut dyn GeometrySink) -> TickReport {
        let mut report = TickReport::default();

        while let Some(edit) = self.pending_edits.pop_front() {
            if self.apply_edit(edit) {
                report.edits_applied += 1;
            } else {
                report.edits_rejected += 1;
            }
        }

        self.solve_all();

        let start = Instant::now();
        report.chunks_rebuilt = self.rebuild_dirty(sink);
        report.rebuild_time = start.elapsed();

        if report.chunks_rebuilt > 0 {
            info!(
                "Rebuilt {} chunks in {:?} after {} edits",
                report.chunks_rebuilt, report.rebuild_time, report.edits_applied
            );
        }
        report
    }

    /// Writes one voxel and repairs light around it, without meshing.
    ///
    /// Returns `false` and leaves the world untouched if `edit` is outside the world.
    pub fn apply_edit(&mut self, edit: VoxelEdit) -> bool {
        if !self.world.contains_voxel(edit.coords) {
            warn!("Rejected edit outside the world at {:?}", edit.coords);
            return false;
        }
        trace!("Applying {:?}", edit);

        if edit.id == 0 {
            self.break_voxel(edit.coords);
        } else {
            self.place_voxel(edit.coords, Voxel::new(edit.id));
        }
        true
    }

    /// Meshes every dirty chunk into `sink`. Returns the number of chunks rebuilt.
    pub fn rebuild_dirty(&mut self, sink: &mut dyn GeometrySink) -> usize {
        self.mesher
            .rebuild_dirty(&mut self.world, self.atlas.as_ref(), sink)
    }

    /// Casts a pick ray into the world.
    ///
    /// # Arguments
    /// * `origin` - Ray start in world space
    /// * `direction` - Ray direction
    /// * `max_distance` - Maximum travel, in voxels
    pub fn pick(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> RayCastResult {
        self.world.ray_cast(origin, direction, max_distance)
    }

    /// Where a voxel placed against a pick result would go: the cell in front of
    /// the hit face. `None` if the ray hit nothing or started inside a solid voxel.
    pub fn place_target(hit: &RayCastResult) -> Option<Point3<i32>> {
        if hit.normal == Vector3::new(0, 0, 0) {
            return None;
        }
        hit.hit().map(|_| hit.adjacent())
    }

    fn solve_all(&mut self) {
        for solver in self.rgb_solvers.iter_mut() {
            solver.solve(&mut self.world);
        }
        self.sky_solver.solve(&mut self.world);
    }

    /// Clears a voxel, then lets block light and sky light flow back into the gap.
    fn break_voxel(&mut self, coords: Point3<i32>) {
        let world = &mut self.world;
        world.set_voxel(coords, Voxel::AIR);

        // An emitter may have been removed.
        for solver in self.rgb_solvers.iter_mut() {
            solver.remove(world, coords);
            solver.solve(world);
        }

        // Reopen the sky column if the gap is now exposed to the sky.
        let above = coords + Vector3::unit_y();
        let open_above = !world.contains_voxel(above)
            || world.get_light(above, LightChannel::Sky) == MAX_LIGHT_LEVEL;
        if open_above {
            for y in (0..=coords.y).rev() {
                let cell = Point3::new(coords.x, y, coords.z);
                if world.is_blocked(cell) {
                    break;
                }
                self.sky_solver.add_emission(world, cell, MAX_LIGHT_LEVEL);
            }
        }

        for side in BlockSide::all() {
            let neighbour = coords + side.normal();
            for solver in self.rgb_solvers.iter_mut() {
                solver.add(world, neighbour);
            }
            self.sky_solver.add(world, neighbour);
        }
        self.solve_all();
    }

    /// Fills a voxel, removing the light it now blocks and lighting it if it emits.
    fn place_voxel(&mut self, coords: Point3<i32>, voxel: Voxel) {
        let world = &mut self.world;
        world.set_voxel(coords, voxel);

        for solver in self.rgb_solvers.iter_mut() {
            solver.remove(world, coords);
        }
        self.sky_solver.remove(world, coords);

        // The column below loses its direct sky light.
        for y in (0..coords.y).rev() {
            let cell = Point3::new(coords.x, y, coords.z);
            self.sky_solver.remove(world, cell);
            if y == 0 || world.is_blocked(cell) {
                break;
            }
        }
        self.solve_all();

        let emission = voxel.kind().map_or(0, |kind| kind.rgb_emission());
        if emission > 0 {
            for solver in self.rgb_solvers.iter_mut() {
                solver.add_emission(&mut self.world, coords, emission);
                solver.solve(&mut self.world);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationMethod;
    use crate::engine_state::rendering::MeshCache;
    use crate::engine_state::voxels::block::block_type::VoxelKind;

    fn engine(generation: GenerationMethod) -> EngineState {
        let config = WorldConfig {
            chunks: [2, 1, 2],
            chunk_size: [8, 8, 8],
            generation,
            ..WorldConfig::default()
        };
        EngineState::new(&config).unwrap()
    }

    fn sky(engine: &EngineState, x: i32, y: i32, z: i32) -> u8 {
        engine.world().get_light(Point3::new(x, y, z), LightChannel::Sky)
    }

    #[test]
    fn first_tick_meshes_every_chunk() {
        let mut engine = engine(GenerationMethod::Solid);
        let mut cache = MeshCache::new();
        let report = engine.tick(&mut cache);
        assert_eq!(report.chunks_rebuilt, 4);
        assert_eq!(cache.len(), 4);

        let report = engine.tick(&mut cache);
        assert_eq!(report.chunks_rebuilt, 0);
    }

    #[test]
    fn out_of_world_edits_are_rejected() {
        let mut engine = engine(GenerationMethod::Empty);
        engine.queue_edit(VoxelEdit::new(Point3::new(-1, 0, 0), 1));
        engine.queue_edit(VoxelEdit::new(Point3::new(0, 0, 0), 1));
        assert_eq!(engine.pending_edits(), 2);

        let report = engine.tick(&mut MeshCache::new());
        assert_eq!(report.edits_applied, 1);
        assert_eq!(report.edits_rejected, 1);
        assert_eq!(engine.pending_edits(), 0);
    }

    #[test]
    fn placing_a_roof_shades_the_column() {
        let mut engine = engine(GenerationMethod::Empty);
        assert_eq!(sky(&engine, 3, 0, 3), 15);

        engine.apply_edit(VoxelEdit::new(Point3::new(3, 6, 3), 1));
        assert_eq!(sky(&engine, 3, 7, 3), 15);
        assert_eq!(sky(&engine, 3, 6, 3), 0);
        // Directly below the roof, light now arrives sideways.
        assert_eq!(sky(&engine, 3, 5, 3), 14);
        assert_eq!(sky(&engine, 3, 0, 3), 14);
    }

    #[test]
    fn breaking_the_roof_restores_the_column() {
        let mut engine = engine(GenerationMethod::Empty);
        let roof = Point3::new(3, 6, 3);
        engine.apply_edit(VoxelEdit::new(roof, 1));
        engine.apply_edit(VoxelEdit::new(roof, 0));

        for y in 0..8 {
            assert_eq!(sky(&engine, 3, y, 3), 15, "y = {}", y);
        }
    }

    #[test]
    fn lamp_lights_and_unlights() {
        let mut engine = engine(GenerationMethod::Empty);
        let lamp = Point3::new(8, 3, 8);
        let nearby = Point3::new(8, 3, 11);

        engine.apply_edit(VoxelEdit::new(lamp, VoxelKind::Lamp as VoxelId));
        assert_eq!(engine.world().get_light(lamp, LightChannel::Red), 15);
        assert_eq!(engine.world().get_light(nearby, LightChannel::Blue), 12);

        engine.apply_edit(VoxelEdit::new(lamp, 0));
        for channel in LightChannel::RGB {
            assert_eq!(engine.world().get_light(nearby, channel), 0);
        }
        assert_eq!(engine.world().get_light(lamp, LightChannel::Sky), 15);
    }

    #[test]
    fn pick_then_place_in_front_of_hit() {
        let mut engine = engine(GenerationMethod::Empty);
        engine.apply_edit(VoxelEdit::new(Point3::new(5, 5, 5), 1));

        let hit = engine.pick(Point3::new(5.5, 5.5, 12.5), Vector3::new(0.0, 0.0, -1.0), 20.0);
        assert_eq!(EngineState::place_target(&hit), Some(Point3::new(5, 5, 6)));

        let miss = engine.pick(Point3::new(1.5, 5.5, 12.5), Vector3::new(0.0, 0.0, -1.0), 5.0);
        assert_eq!(EngineState::place_target(&miss), None);
    }
}
