//! Mesh generation for voxel rendering.
//!
//! This module provides the geometry building blocks the chunk mesher assembles:
//!
//! # Architecture
//! - [`ChunkMesh`]: The vertex and index lists of one chunk
//! - [`Face`]: A single voxel face and its corner positions
//! - [`FaceLight`]: Smoothed per-corner light for a face

mod face;
mod mesh;

pub use face::{Face, FaceLight};
pub use mesh::ChunkMesh;
