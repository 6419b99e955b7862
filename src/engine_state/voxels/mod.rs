//! # Voxel Storage
//!
//! This module contains the voxel data model: what a voxel is, how chunks store
//! voxels and light, and how the world stitches chunks into one addressable grid.
//!
//! ## Architecture
//!
//! * **Block**: The voxel value, its well-known kinds, and the six faces of a voxel
//! * **Lightmap**: Packed four-channel light storage for one chunk
//! * **Chunk**: Fixed-size dense arrays of voxels and light, plus a dirty flag
//! * **World**: Owns every chunk and resolves global coordinates across chunk boundaries
//! * **Raycast**: Grid traversal for picking voxels along a ray
//!
//! ## Data Flow
//!
//! 1. The world receives voxel or light writes in global coordinates
//! 2. It delegates to the owning chunk and marks affected chunks dirty
//! 3. The rebuild sweep collects dirty chunks and hands them to the mesher

pub mod block;
pub mod chunk;
pub mod lightmap;
pub mod raycast;
pub mod world;
