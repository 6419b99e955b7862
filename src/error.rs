//! # Error Module
//!
//! Construction-time failures of the voxel world. Once a [`WorldGrid`] exists every
//! voxel, light and mesh operation is total: out-of-range coordinates resolve to a
//! safe default instead of an error, so nothing past construction returns this type.
//!
//! [`WorldGrid`]: crate::WorldGrid

use thiserror::Error;

/// Errors raised while loading configuration or building a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// At least one axis of the chunk grid has no chunks.
    #[error("world must contain at least one chunk per axis, got {x}x{y}x{z}")]
    #[allow(missing_docs)]
    ZeroWorldExtent { x: i32, y: i32, z: i32 },

    /// At least one axis of a chunk has no voxels.
    #[error("chunk size must be positive on every axis, got {x}x{y}x{z}")]
    #[allow(missing_docs)]
    InvalidChunkSize { x: i32, y: i32, z: i32 },

    /// The world holds more voxels than can be addressed.
    #[error("world of {chunks} chunks with {voxels_per_chunk} voxels each is too large")]
    WorldTooLarge {
        /// Number of chunks requested.
        chunks: i64,
        /// Number of voxels in each chunk.
        voxels_per_chunk: i64,
    },

    /// Physical voxel edge length must be finite and positive.
    #[error("voxel size must be finite and positive, got {0}")]
    InvalidVoxelSize(f32),

    /// Atlas tile or texture dimensions must be finite and positive.
    #[error("atlas dimensions must be finite and positive, got tile {tile} in {width}x{height}")]
    #[allow(missing_docs)]
    InvalidAtlas { tile: f32, width: f32, height: f32 },

    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`WorldConfig`](crate::WorldConfig).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
