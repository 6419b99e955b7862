//! # Lighting Module
//!
//! Incremental flood-fill light propagation. One [`LightSolver`] runs per light
//! channel; each keeps a removal queue and an addition queue of [`LightEntry`]
//! values and restores the lightmap invariant when [`LightSolver::solve`] drains
//! them:
//!
//! > a voxel lit at level `v > 0` either emits, or has a face neighbour at `v - 1` or more.
//!
//! Light drops by exactly one per face step and never enters solid voxels, so a
//! level-15 source reaches at most 14 voxels away.
//!
//! ## Removal Before Addition
//!
//! `solve` drains the removal queue completely before touching the addition queue.
//! Removal clears every voxel that was fed by a removed source and collects the
//! brighter voxels on the border of the cleared region, which are independent
//! sources. Only then does addition flood back out from those survivors. Running the
//! phases interleaved would let stale light re-feed the region being cleared.
//!
//! The world is passed explicitly into every call; solvers keep nothing between
//! calls but their (empty) queues.

use std::collections::VecDeque;

use cgmath::Point3;
use log::debug;

use super::voxels::block::block_side::BlockSide;
use super::voxels::lightmap::LightChannel;
use super::voxels::world::WorldGrid;

mod sky;

pub use sky::{seed_emitters, seed_sky_light};

/// A voxel and a light level, queued for propagation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LightEntry {
    /// Global voxel coordinates.
    pub coords: Point3<i32>,
    /// Light level at the time the entry was queued.
    pub level: u8,
}

/// FIFO work list of light entries.
///
/// Backed by a ring buffer reserved up front, since a flood rarely touches more
/// voxels than one chunk holds.
#[derive(Debug, Default)]
pub struct LightQueue {
    entries: VecDeque<LightEntry>,
}

impl LightQueue {
    /// Creates a queue with room for `capacity` entries before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        LightQueue {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends an entry.
    #[inline]
    pub fn push(&mut self, coords: Point3<i32>, level: u8) {
        self.entries.push_back(LightEntry { coords, level });
    }

    /// Removes the oldest entry.
    #[inline]
    pub fn pop(&mut self) -> Option<LightEntry> {
        self.entries.pop_front()
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Number of entries processed by one [`LightSolver::solve`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Entries drained from the removal queue.
    pub removed: usize,
    /// Entries drained from the addition queue.
    pub added: usize,
}

/// Keeps one light channel consistent with its sources.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_light::{LightChannel, LightSolver, WorldConfig, WorldGrid};
///
/// let config = WorldConfig { chunks: [1, 1, 1], chunk_size: [8, 8, 8], ..WorldConfig::default() };
/// let mut world = WorldGrid::new(&config).unwrap();
/// let mut red = LightSolver::new(LightChannel::Red, 512);
///
/// red.add_emission(&mut world, Point3::new(0, 0, 0), 15);
/// red.solve(&mut world);
/// assert_eq!(world.get_light(Point3::new(2, 0, 0), LightChannel::Red), 13);
///
/// red.remove(&mut world, Point3::new(0, 0, 0));
/// red.solve(&mut world);
/// assert_eq!(world.get_light(Point3::new(2, 0, 0), LightChannel::Red), 0);
/// ```
#[derive(Debug)]
pub struct LightSolver {
    channel: LightChannel,
    remove_queue: LightQueue,
    add_queue: LightQueue,
}

impl LightSolver {
    /// Creates a solver for `channel` with queues reserved for `capacity` entries.
    pub fn new(channel: LightChannel, capacity: usize) -> Self {
        LightSolver {
            channel,
            remove_queue: LightQueue::with_capacity(capacity),
            add_queue: LightQueue::with_capacity(capacity),
        }
    }

    /// The channel this solver maintains.
    pub fn channel(&self) -> LightChannel {
        self.channel
    }

    /// Whether both queues are empty.
    pub fn is_idle(&self) -> bool {
        self.remove_queue.is_empty() && self.add_queue.is_empty()
    }

    /// Re-propagates the light already stored at `coords`.
    ///
    /// Used after an edit opens space next to a lit voxel. No-op when the stored
    /// level is 1 or less, or outside the world.
    pub fn add(&mut self, world: &mut WorldGrid, coords: Point3<i32>) {
        let level = world.get_light(coords, self.channel);
        self.add_emission(world, coords, level);
    }

    /// Sets the light at `coords` to `emission` and queues it for propagation.
    ///
    /// No-op when `emission` is 1 or less, or outside the world.
    pub fn add_emission(&mut self, world: &mut WorldGrid, coords: Point3<i32>, emission: u8) {
        if emission <= 1 || !world.contains_voxel(coords) {
            return;
        }
        world.set_light(coords, self.channel, emission);
        self.add_queue.push(coords, emission);
    }

    /// Clears the light at `coords` and queues the old level for removal.
    ///
    /// No-op when the voxel is already dark, or outside the world.
    pub fn remove(&mut self, world: &mut WorldGrid, coords: Point3<i32>) {
        let level = world.get_light(coords, self.channel);
        if level == 0 {
            return;
        }
        world.set_light(coords, self.channel, 0);
        self.remove_queue.push(coords, level);
    }

    /// Drains the removal queue, then the addition queue.
    ///
    /// Returns how many entries each phase processed. Calling it with both
    /// queues empty changes nothing.
    pub fn solve(&mut self, world: &mut WorldGrid) -> SolveStats {
        let mut stats = SolveStats::default();
        if self.is_idle() {
            return stats;
        }

        while let Some(entry) = self.remove_queue.pop() {
            stats.removed += 1;
            for side in BlockSide::all() {
                let coords = entry.coords + side.normal();
                if !world.contains_voxel(coords) {
                    continue;
                }

                let level = world.get_light(coords, self.channel);
                if level != 0 && level + 1 == entry.level {
                    // Fed by the removed entry: clear it and keep shrinking.
                    world.set_light(coords, self.channel, 0);
                    self.remove_queue.push(coords, level);
                } else if level >= entry.level {
                    // Independent source on the border: flood back from it.
                    self.add_queue.push(coords, level);
                }
            }
        }

        while let Some(entry) = self.add_queue.pop() {
            stats.added += 1;
            // A reseeded border voxel may have been cleared after it was queued;
            // the stored level is authoritative.
            let source_level = world.get_light(entry.coords, self.channel);
            if source_level <= 1 {
                continue;
            }

            for side in BlockSide::all() {
                let coords = entry.coords + side.normal();
                let Some(voxel) = world.get_voxel(coords) else {
                    continue;
                };

                let level = world.get_light(coords, self.channel);
                if !voxel.is_solid() && level + 2 <= source_level {
                    world.set_light(coords, self.channel, source_level - 1);
                    self.add_queue.push(coords, source_level - 1);
                }
            }
        }

        debug!(
            "Solved {:?} light: {} removals, {} additions",
            self.channel, stats.removed, stats.added
        );
        stats
    }
}
