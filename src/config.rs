//! # Configuration Module
//!
//! World parameters loaded once at startup. Every field has a default so a partial
//! JSON document (or none at all) produces a usable world; [`WorldConfig::validate`]
//! rejects shapes that cannot be built before any chunk is allocated.

use std::{fs::File, io::BufReader, path::Path};

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// The method used to populate voxel identifiers when a world is created.
///
/// Possible values:
/// - `"perlin"`: layered 3D Perlin terrain over a bedrock floor
/// - `"checkerboard"`: alternates solid and air voxels (testing)
/// - `"scatter"`: seeded pseudo-random sparse voxels (testing)
/// - `"solid"`: every voxel solid
/// - `"empty"`: every voxel air
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Natural-looking terrain sampled from Perlin noise.
    #[default]
    Perlin,
    /// Alternating solid and air voxels in all three axes.
    Checkerboard,
    /// Sparse solid voxels placed by a seeded random generator.
    Scatter,
    /// Every voxel is solid.
    Solid,
    /// Every voxel is air.
    Empty,
}

/// Weights used to smooth per-vertex light across a face.
///
/// A corner value is `(center * center_weight + a + b + c) / (center_weight * divisor_scale)`
/// where `center` is the voxel directly in front of the face and `a`, `b`, `c` are the
/// three in-plane samples touching that corner.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SmoothLighting {
    /// Weight of the sample directly in front of the face.
    pub center_weight: f32,
    /// Multiplied with `center_weight` to form the divisor.
    pub divisor_scale: f32,
}

impl Default for SmoothLighting {
    fn default() -> Self {
        SmoothLighting {
            center_weight: 3.0,
            divisor_scale: 35.0,
        }
    }
}

impl SmoothLighting {
    /// Combines a center sample with the three samples around one face corner.
    #[inline]
    pub fn corner(&self, center: f32, a: f32, b: f32, c: f32) -> f32 {
        (center * self.center_weight + a + b + c) / (self.center_weight * self.divisor_scale)
    }
}

/// Layout of the texture atlas: a horizontal strip of square tiles.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    /// Edge length of one tile, in texels.
    pub tile_size: f32,
    /// Width of the atlas texture, in texels.
    pub width: f32,
    /// Height of the atlas texture, in texels.
    pub height: f32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            tile_size: 16.0,
            width: 256.0,
            height: 16.0,
        }
    }
}

/// Parameters describing a world and how it is generated and meshed.
///
/// # Examples
///
/// ```
/// use voxel_light::WorldConfig;
///
/// let config: WorldConfig = serde_json::from_str(r#"{ "chunks": [2, 1, 2] }"#).unwrap();
/// assert_eq!(config.chunks, [2, 1, 2]);
/// assert_eq!(config.chunk_size, [16, 16, 16]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of chunks along each axis.
    pub chunks: [i32; 3],
    /// Number of voxels along each axis of a chunk.
    pub chunk_size: [i32; 3],
    /// Physical edge length of one voxel.
    pub voxel_size: f32,
    /// Texture atlas layout.
    pub atlas: AtlasConfig,
    /// How initial voxel identifiers are produced.
    pub generation: GenerationMethod,
    /// Seed for the noise and random generators.
    pub seed: u32,
    /// Per-vertex light smoothing weights.
    pub smooth_lighting: SmoothLighting,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunks: [4, 2, 4],
            chunk_size: [16, 16, 16],
            voxel_size: 1.0,
            atlas: AtlasConfig::default(),
            generation: GenerationMethod::default(),
            seed: 0,
            smooth_lighting: SmoothLighting::default(),
        }
    }
}

impl WorldConfig {
    /// Reads and validates a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns [`WorldError::Io`] or [`WorldError::Json`] if the file cannot be read or
    /// parsed, and any error from [`WorldConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: WorldConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the construction-time invariants of the world shape.
    pub fn validate(&self) -> Result<(), WorldError> {
        let [x, y, z] = self.chunks;
        if x <= 0 || y <= 0 || z <= 0 {
            return Err(WorldError::ZeroWorldExtent { x, y, z });
        }

        let [sx, sy, sz] = self.chunk_size;
        if sx <= 0 || sy <= 0 || sz <= 0 {
            return Err(WorldError::InvalidChunkSize {
                x: sx,
                y: sy,
                z: sz,
            });
        }

        // Global voxel coordinates are i32, so the extent on every axis must fit.
        let chunks = x as i64 * y as i64 * z as i64;
        let voxels_per_chunk = sx as i64 * sy as i64 * sz as i64;
        let extent_fits = [(x, sx), (y, sy), (z, sz)]
            .iter()
            .all(|&(c, s)| (c as i64) * (s as i64) <= i32::MAX as i64);
        // Chunk and voxel indices are computed in i32 as well.
        let indices_fit = chunks <= i32::MAX as i64 && voxels_per_chunk <= i32::MAX as i64;
        if !extent_fits || !indices_fit || chunks.checked_mul(voxels_per_chunk).is_none() {
            return Err(WorldError::WorldTooLarge {
                chunks,
                voxels_per_chunk,
            });
        }

        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(WorldError::InvalidVoxelSize(self.voxel_size));
        }

        let AtlasConfig {
            tile_size,
            width,
            height,
        } = self.atlas;
        if [tile_size, width, height]
            .iter()
            .any(|v| !(v.is_finite() && *v > 0.0))
        {
            return Err(WorldError::InvalidAtlas {
                tile: tile_size,
                width,
                height,
            });
        }

        Ok(())
    }

    /// Chunks per axis as a vector.
    pub fn chunks_vec(&self) -> Vector3<i32> {
        Vector3::from(self.chunks)
    }

    /// Voxels per chunk axis as a vector.
    pub fn chunk_size_vec(&self) -> Vector3<i32> {
        Vector3::from(self.chunk_size)
    }
}
