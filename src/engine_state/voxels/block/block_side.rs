//! # Block Side Module
//!
//! This module defines the six faces of a voxel cube together with the geometry
//! each face needs: its outward normal, the two in-plane tangent axes, and the 3x3
//! neighbourhood sampled for smooth lighting.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel.
///
/// Each variant is assigned a stable integer value used to index per-side tables
/// such as atlas overrides.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(&self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// Finds the face whose outward normal equals `normal`.
    ///
    /// # Returns
    /// `None` unless `normal` is one of the six axis unit vectors.
    pub fn from_normal(normal: Vector3<i32>) -> Option<BlockSide> {
        BlockSide::all()
            .into_iter()
            .find(|side| side.normal() == normal)
    }

    /// The in-plane axes `(u, v)` of this face as seen from outside the voxel.
    ///
    /// `u` runs left to right and `v` bottom to top in texture space, and
    /// `u × v` equals the outward normal so quads built from them wind
    /// counter-clockwise when viewed from outside.
    pub fn tangents(&self) -> (Vector3<i32>, Vector3<i32>) {
        match self {
            BlockSide::FRONT => (Vector3::new(1, 0, 0), Vector3::new(0, 1, 0)),
            BlockSide::BACK => (Vector3::new(-1, 0, 0), Vector3::new(0, 1, 0)),
            BlockSide::BOTTOM => (Vector3::new(-1, 0, 0), Vector3::new(0, 0, -1)),
            BlockSide::TOP => (Vector3::new(1, 0, 0), Vector3::new(0, 0, -1)),
            BlockSide::LEFT => (Vector3::new(0, 0, 1), Vector3::new(0, 1, 0)),
            BlockSide::RIGHT => (Vector3::new(0, 0, -1), Vector3::new(0, 1, 0)),
        }
    }

    /// Offsets of the nine voxels sampled to light this face.
    ///
    /// Index 0 is the voxel directly in front of the face. Indices 1..=8 walk the
    /// surrounding ring in the face plane, starting at the upper-left corner and
    /// moving clockwise: upper-left, up, upper-right, right, lower-right, down,
    /// lower-left, left.
    pub fn light_samples(&self) -> [Vector3<i32>; 9] {
        let n = self.normal();
        let (u, v) = self.tangents();
        [
            n,
            n - u + v,
            n + v,
            n + u + v,
            n + u,
            n + u - v,
            n - v,
            n - u - v,
            n - u,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;

    #[test]
    fn tangents_wind_outward() {
        for side in BlockSide::all() {
            let (u, v) = side.tangents();
            assert_eq!(u.cross(v), side.normal(), "{:?}", side);
        }
    }

    #[test]
    fn normals_are_distinct_and_invertible() {
        let mut sum = Vector3::zero();
        for side in BlockSide::all() {
            sum += side.normal();
            assert_eq!(BlockSide::from_normal(side.normal()), Some(side));
        }
        assert_eq!(sum, Vector3::zero());
        assert_eq!(BlockSide::from_normal(Vector3::new(1, 1, 0)), None);
    }

    #[test]
    fn light_samples_stay_in_front_plane() {
        for side in BlockSide::all() {
            let n = side.normal();
            let samples = side.light_samples();
            assert_eq!(samples[0], n);
            for offset in samples {
                assert_eq!(offset.x * n.x + offset.y * n.y + offset.z * n.z, 1);
            }
        }
    }

    #[test]
    fn front_ring_matches_screen_order() {
        let samples = BlockSide::FRONT.light_samples();
        assert_eq!(samples[1], Vector3::new(-1, 1, 1));
        assert_eq!(samples[4], Vector3::new(1, 0, 1));
        assert_eq!(samples[7], Vector3::new(-1, -1, 1));
    }
}
