//! Vertex data structures for voxel meshes.
//!
//! This module defines the vertex format handed to the geometry sink. The layout is
//! plain old data so a renderer can upload a vertex slice with `bytemuck::cast_slice`.

use cgmath::Point3;

/// A vertex of a voxel face.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Light: [f32; 4] (16 bytes), red, green, blue and sky
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VoxelVertex {
    /// Position relative to the chunk origin, in world units
    pub position: [f32; 3],
    /// UV texture coordinates in the atlas (normalized 0.0-1.0)
    pub uv: [f32; 2],
    /// Smoothed light per channel, normalized 0.0-1.0
    pub light: [f32; 4],
}

impl VoxelVertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - Position relative to the chunk origin
    /// * `u` - U texture coordinate
    /// * `v` - V texture coordinate
    /// * `light` - Smoothed light for each channel
    pub fn new(pos: Point3<f32>, u: f32, v: f32, light: [f32; 4]) -> Self {
        VoxelVertex {
            position: [pos.x, pos.y, pos.z],
            uv: [u, v],
            light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<VoxelVertex>(), 36);
        let vertices = [VoxelVertex::new(Point3::new(1.0, 2.0, 3.0), 0.5, 0.25, [0.0; 4])];
        let floats: &[f32] = bytemuck::cast_slice(&vertices);
        assert_eq!(&floats[..5], &[1.0, 2.0, 3.0, 0.5, 0.25]);
    }
}
