//! # Chunk Creation Module
//!
//! Procedural seeding of voxel identifiers. A generator is a pure function of
//! global voxel coordinates, so the same world shape and seed always produce the
//! same voxels regardless of the order chunks are filled in.
//!
//! Generators are swappable; [`generator_for`] picks the one named by
//! [`GenerationMethod`].

use cgmath::{EuclideanSpace, Point3, Vector3};
use noise::{NoiseFn, Perlin};

use crate::config::{GenerationMethod, WorldConfig};
use crate::engine_state::voxels::block::{block_type::VoxelKind, Voxel};

use super::Chunk;

/// Scaling applied to global coordinates before sampling Perlin noise, per axis.
pub const PERLIN_SCALE_FACTORS: [f64; 3] = [0.005625, 0.009625, 0.00525];
/// Offset added to the raw Perlin sample before scaling it into a height fraction.
pub const PERLIN_HEIGHT_OFFSET: f64 = 0.6;
/// Scale applied to the offset Perlin sample.
pub const PERLIN_HEIGHT_SCALE: f64 = 0.8;
/// Voxels at or below this global height are always bedrock.
pub const BEDROCK_LEVEL: i32 = 0;
/// Fraction of voxels made solid by [`ScatterGenerator`].
pub const SCATTER_DENSITY: f64 = 0.1;

/// Produces the initial voxel at a global coordinate.
pub trait ChunkGenerator {
    /// The voxel to place at `global`. Must be deterministic.
    fn voxel_at(&self, global: Point3<i32>) -> Voxel;
}

/// Terrain whose surface height follows 3D Perlin noise, laid over a bedrock floor.
///
/// A voxel is solid when its height within the chunk column, as a fraction of the
/// chunk height, falls below the noise-derived height fraction.
pub struct PerlinTerrain {
    perlin: Perlin,
    chunk_size: Vector3<i32>,
}

impl PerlinTerrain {
    /// Creates a terrain generator.
    ///
    /// # Arguments
    /// * `seed` - Seed for the Perlin permutation table
    /// * `chunk_size` - Voxels per chunk axis; stretches the noise to the chunk grid
    pub fn new(seed: u32, chunk_size: Vector3<i32>) -> Self {
        PerlinTerrain {
            perlin: Perlin::new(seed),
            chunk_size,
        }
    }

    /// Converts global voxel coordinates to the point sampled in noise space.
    fn to_perlin_pos(&self, pos: Point3<i32>) -> [f64; 3] {
        [
            pos.x as f64 * self.chunk_size.x as f64 * PERLIN_SCALE_FACTORS[0],
            pos.y as f64 * self.chunk_size.y as f64 * PERLIN_SCALE_FACTORS[1],
            pos.z as f64 * self.chunk_size.z as f64 * PERLIN_SCALE_FACTORS[2],
        ]
    }
}

impl ChunkGenerator for PerlinTerrain {
    fn voxel_at(&self, global: Point3<i32>) -> Voxel {
        if global.y <= BEDROCK_LEVEL {
            return Voxel::of_kind(VoxelKind::Bedrock);
        }

        let sample = self.perlin.get(self.to_perlin_pos(global));
        let height = (sample + PERLIN_HEIGHT_OFFSET) * PERLIN_HEIGHT_SCALE;
        if (global.y as f64 / self.chunk_size.y as f64) < height {
            Voxel::of_kind(VoxelKind::Stone)
        } else {
            Voxel::AIR
        }
    }
}

/// Alternates solid and air voxels along every axis.
pub struct CheckerboardGenerator;

impl ChunkGenerator for CheckerboardGenerator {
    fn voxel_at(&self, global: Point3<i32>) -> Voxel {
        if (global.x + global.y + global.z).rem_euclid(2) == 0 {
            Voxel::of_kind(VoxelKind::Stone)
        } else {
            Voxel::AIR
        }
    }
}

/// Sparse solid voxels chosen by a random generator seeded from the coordinates.
pub struct ScatterGenerator {
    seed: u32,
}

impl ScatterGenerator {
    /// Creates a scatter generator with the given seed.
    pub fn new(seed: u32) -> Self {
        ScatterGenerator { seed }
    }

    /// Mixes the seed and coordinates into a per-voxel random seed.
    fn coordinate_seed(&self, pos: Point3<i32>) -> u64 {
        let mut hash = self.seed as u64 ^ 0x9E37_79B9_7F4A_7C15;
        for component in [pos.x, pos.y, pos.z] {
            hash ^= component as u32 as u64;
            hash = hash.wrapping_mul(0xBF58_476D_1CE4_E5B9);
            hash ^= hash >> 31;
        }
        hash
    }
}

impl ChunkGenerator for ScatterGenerator {
    fn voxel_at(&self, global: Point3<i32>) -> Voxel {
        let mut rng = fastrand::Rng::with_seed(self.coordinate_seed(global));
        if rng.f64() < SCATTER_DENSITY {
            Voxel::of_kind(VoxelKind::Stone)
        } else {
            Voxel::AIR
        }
    }
}

/// Fills every voxel.
pub struct SolidGenerator;

impl ChunkGenerator for SolidGenerator {
    fn voxel_at(&self, _global: Point3<i32>) -> Voxel {
        Voxel::of_kind(VoxelKind::Stone)
    }
}

/// Leaves every voxel empty.
pub struct EmptyGenerator;

impl ChunkGenerator for EmptyGenerator {
    fn voxel_at(&self, _global: Point3<i32>) -> Voxel {
        Voxel::AIR
    }
}

/// Builds the generator selected by the configuration.
pub fn generator_for(config: &WorldConfig) -> Box<dyn ChunkGenerator> {
    match config.generation {
        GenerationMethod::Perlin => Box::new(PerlinTerrain::new(config.seed, config.chunk_size_vec())),
        GenerationMethod::Checkerboard => Box::new(CheckerboardGenerator),
        GenerationMethod::Scatter => Box::new(ScatterGenerator::new(config.seed)),
        GenerationMethod::Solid => Box::new(SolidGenerator),
        GenerationMethod::Empty => Box::new(EmptyGenerator),
    }
}

impl Chunk {
    /// Overwrites every voxel with the generator's output, in storage order.
    pub(in crate::engine_state::voxels) fn fill_from(&mut self, generator: &dyn ChunkGenerator) {
        let origin = self.origin();
        for index in 0..self.voxels.len() {
            let local = self.local_of(index);
            self.voxels[index] = generator.voxel_at(origin + local.to_vec());
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perlin_floor_is_bedrock() {
        let terrain = PerlinTerrain::new(0, Vector3::new(16, 16, 16));
        for x in 0..8 {
            for z in 0..8 {
                assert_eq!(
                    terrain.voxel_at(Point3::new(x, 0, z)).kind(),
                    Some(VoxelKind::Bedrock)
                );
            }
        }
    }

    #[test]
    fn perlin_is_deterministic() {
        let a = PerlinTerrain::new(7, Vector3::new(8, 8, 8));
        let b = PerlinTerrain::new(7, Vector3::new(8, 8, 8));
        for y in 0..8 {
            let pos = Point3::new(3, y, 5);
            assert_eq!(a.voxel_at(pos), b.voxel_at(pos));
        }
    }

    #[test]
    fn scatter_is_deterministic_and_sparse() {
        let generator = ScatterGenerator::new(11);
        let mut solid = 0;
        for x in 0..20 {
            for y in 0..20 {
                for z in 0..20 {
                    let pos = Point3::new(x, y, z);
                    let voxel = generator.voxel_at(pos);
                    assert_eq!(voxel, generator.voxel_at(pos));
                    if voxel.is_solid() {
                        solid += 1;
                    }
                }
            }
        }
        assert!(solid > 0 && solid < 8000 / 2);
    }

    #[test]
    fn checkerboard_alternates() {
        let generator = CheckerboardGenerator;
        assert!(generator.voxel_at(Point3::new(0, 0, 0)).is_solid());
        assert!(!generator.voxel_at(Point3::new(1, 0, 0)).is_solid());
        assert!(!generator.voxel_at(Point3::new(0, 0, 1)).is_solid());
        assert!(generator.voxel_at(Point3::new(1, 1, 0)).is_solid());
    }

    #[test]
    fn fill_from_uses_global_coordinates() {
        let mut chunk = Chunk::new(Point3::new(1, 0, 0), Vector3::new(2, 2, 2));
        chunk.fill_from(&CheckerboardGenerator);
        // Local (0,0,0) is global (2,0,0): even parity, solid.
        assert!(chunk.is_blocked(Point3::new(0, 0, 0)));
        assert!(!chunk.is_blocked(Point3::new(1, 0, 0)));
        assert!(chunk.is_dirty());
    }
}
