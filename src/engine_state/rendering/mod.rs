//! Geometry production for the voxel engine.
//!
//! This module converts chunks into renderable face geometry and defines the two
//! seams to the external renderer: a texture atlas lookup consumed while meshing,
//! and a geometry sink that receives finished meshes. Drawing itself happens
//! elsewhere.

pub mod atlas;
pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use atlas::{AtlasRect, StripAtlas, TextureAtlas};
pub use meshing::{ChunkMesh, ChunkMesher, GeometrySink, MeshCache};
pub use vertex::VoxelVertex;
