use cgmath::{Point3, Vector3};

use crate::config::SmoothLighting;
use crate::engine_state::rendering::atlas::AtlasRect;
use crate::engine_state::rendering::vertex::VoxelVertex;
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, Voxel},
    lightmap::LightChannel,
    world::WorldGrid,
};

/// Per-corner light of one face, one value per channel.
///
/// Corners are stored in the same order as [`Face`] vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceLight {
    /// Lower-left corner
    pub ll: [f32; 4],
    /// Lower-right corner
    pub lr: [f32; 4],
    /// Upper-right corner
    pub ur: [f32; 4],
    /// Upper-left corner
    pub ul: [f32; 4],
}

impl FaceLight {
    /// Samples the 3x3 plane in front of a face and smooths it into corner values.
    ///
    /// Each corner blends the sample directly in front of the face with the three
    /// ring samples touching that corner. Samples outside the world read as dark.
    ///
    /// # Arguments
    /// * `world` - World to read light from
    /// * `global` - Global coordinates of the voxel owning the face
    /// * `side` - Which face
    /// * `smoothing` - Blend weights
    pub fn sample(
        world: &WorldGrid,
        global: Point3<i32>,
        side: BlockSide,
        smoothing: &SmoothLighting,
    ) -> Self {
        let offsets = side.light_samples();
        let mut light = FaceLight::default();

        for channel in LightChannel::ALL {
            let level = |i: usize| world.get_light(global + offsets[i], channel) as f32;
            let center = level(0);
            // Ring, clockwise from the upper-left: r[0]..r[7] == offsets[1..=8]
            let r: [f32; 8] = std::array::from_fn(|i| level(i + 1));
            let c = channel.index();

            light.ll[c] = smoothing.corner(center, r[7], r[6], r[5]);
            light.lr[c] = smoothing.corner(center, r[5], r[4], r[3]);
            light.ur[c] = smoothing.corner(center, r[3], r[2], r[1]);
            light.ul[c] = smoothing.corner(center, r[1], r[0], r[7]);
        }

        light
    }
}

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-right,
/// upper-left) as seen from outside the voxel, so the corners wind counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner, relative to the chunk origin
    pub ll: Point3<f32>,
    /// Lower-right corner, relative to the chunk origin
    pub lr: Point3<f32>,
    /// Upper-right corner, relative to the chunk origin
    pub ur: Point3<f32>,
    /// Upper-left corner, relative to the chunk origin
    pub ul: Point3<f32>,
    /// The voxel the face belongs to
    pub voxel: Voxel,
    /// Which side of the voxel this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the voxel at chunk-local coordinates `local`.
    ///
    /// # Arguments
    /// * `local` - Chunk-local voxel coordinates
    /// * `voxel_size` - Physical edge length of a voxel
    /// * `voxel` - The voxel the face belongs to
    /// * `block_side` - Which side of the voxel
    pub fn new(local: Point3<i32>, voxel_size: f32, voxel: Voxel, block_side: BlockSide) -> Self {
        let (u, v) = block_side.tangents();
        let n = block_side.normal();
        let corner = |su: i32, sv: i32| {
            // Twice the unit-cube corner, so everything stays integral until scaling.
            let doubled: Vector3<i32> = Vector3::new(1, 1, 1) + n + u * su + v * sv;
            Point3::new(
                (local.x as f32 + doubled.x as f32 * 0.5) * voxel_size,
                (local.y as f32 + doubled.y as f32 * 0.5) * voxel_size,
                (local.z as f32 + doubled.z as f32 * 0.5) * voxel_size,
            )
        };

        Face {
            ll: corner(-1, -1),
            lr: corner(1, -1),
            ur: corner(1, 1),
            ul: corner(-1, 1),
            voxel,
            block_side,
        }
    }

    /// The four vertices of this face, lower-left first, counter-clockwise.
    pub fn vertices(&self, uv: AtlasRect, light: &FaceLight) -> [VoxelVertex; 4] {
        [
            VoxelVertex::new(self.ll, uv.u0, uv.v1, light.ll),
            VoxelVertex::new(self.lr, uv.u1, uv.v1, light.lr),
            VoxelVertex::new(self.ur, uv.u1, uv.v0, light.ur),
            VoxelVertex::new(self.ul, uv.u0, uv.v0, light.ul),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    #[test]
    fn front_face_sits_on_positive_z() {
        let face = Face::new(Point3::new(1, 2, 3), 1.0, Voxel::new(1), BlockSide::FRONT);
        assert_eq!(face.ll, Point3::new(1.0, 2.0, 4.0));
        assert_eq!(face.lr, Point3::new(2.0, 2.0, 4.0));
        assert_eq!(face.ur, Point3::new(2.0, 3.0, 4.0));
        assert_eq!(face.ul, Point3::new(1.0, 3.0, 4.0));
    }

    #[test]
    fn back_face_sits_on_negative_z() {
        let face = Face::new(Point3::new(0, 0, 0), 2.0, Voxel::new(1), BlockSide::BACK);
        assert_eq!(face.ll, Point3::new(2.0, 0.0, 0.0));
        assert_eq!(face.lr, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(face.ur, Point3::new(0.0, 2.0, 0.0));
        assert_eq!(face.ul, Point3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn every_face_lies_on_its_plane() {
        for side in BlockSide::all() {
            let face = Face::new(Point3::new(0, 0, 0), 1.0, Voxel::new(1), side);
            let n = side.normal();
            let plane = |p: Point3<f32>| p.x * n.x as f32 + p.y * n.y as f32 + p.z * n.z as f32;
            let expected = if n.x + n.y + n.z > 0 { 1.0 } else { 0.0 };
            for corner in [face.ll, face.lr, face.ur, face.ul] {
                assert_eq!(plane(corner).abs(), expected, "{:?}", side);
            }
        }
    }

    #[test]
    fn uvs_follow_corners() {
        let face = Face::new(Point3::new(0, 0, 0), 1.0, Voxel::new(1), BlockSide::TOP);
        let uv = AtlasRect { u0: 0.1, v0: 0.2, u1: 0.3, v1: 0.4 };
        let [ll, lr, ur, ul] = face.vertices(uv, &FaceLight::default());
        assert_eq!(ll.uv, [0.1, 0.4]);
        assert_eq!(lr.uv, [0.3, 0.4]);
        assert_eq!(ur.uv, [0.3, 0.2]);
        assert_eq!(ul.uv, [0.1, 0.2]);
    }

    fn dark_world() -> WorldGrid {
        let config = WorldConfig {
            chunks: [1, 1, 1],
            chunk_size: [4, 4, 4],
            ..WorldConfig::default()
        };
        WorldGrid::new(&config).unwrap()
    }

    /// Red light of each corner of the FRONT face of voxel (1, 1, 1).
    fn front_red(world: &WorldGrid) -> [f32; 4] {
        let light = FaceLight::sample(
            world,
            Point3::new(1, 1, 1),
            BlockSide::FRONT,
            &SmoothLighting::default(),
        );
        [light.ll[0], light.lr[0], light.ur[0], light.ul[0]]
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn uniform_light_gives_uniform_corners() {
        let world = dark_world();
        let light = FaceLight::sample(
            &world,
            Point3::new(1, 1, 1),
            BlockSide::TOP,
            &SmoothLighting::default(),
        );
        assert_eq!(light, FaceLight::default());
    }

    #[test]
    fn center_sample_lights_every_corner_with_full_weight() {
        let mut world = dark_world();
        // Directly in front of the FRONT face.
        world.set_light(Point3::new(1, 1, 2), LightChannel::Red, 15);

        for corner in front_red(&world) {
            assert!(close(corner, 45.0 / 105.0), "{}", corner);
        }
    }

    #[test]
    fn diagonal_sample_lights_only_its_corner() {
        let mut world = dark_world();
        // FRONT: u = +x, v = +y, so -u + v in front of the face is the upper-left.
        world.set_light(Point3::new(0, 2, 2), LightChannel::Red, 15);

        let [ll, lr, ur, ul] = front_red(&world);
        assert_eq!([ll, lr, ur], [0.0, 0.0, 0.0]);
        assert!(close(ul, 15.0 / 105.0));
    }

    #[test]
    fn edge_sample_lights_the_two_corners_it_touches() {
        let mut world = dark_world();
        // Right of the FRONT face: shared by the lower-right and upper-right corners.
        world.set_light(Point3::new(2, 1, 2), LightChannel::Red, 15);

        let [ll, lr, ur, ul] = front_red(&world);
        assert_eq!([ll, ul], [0.0, 0.0]);
        assert!(close(lr, 15.0 / 105.0));
        assert!(close(ur, 15.0 / 105.0));
    }

    #[test]
    fn lower_edge_sample_lights_the_lower_corners() {
        let mut world = dark_world();
        world.set_light(Point3::new(1, 0, 2), LightChannel::Red, 15);

        let [ll, lr, ur, ul] = front_red(&world);
        assert_eq!([ur, ul], [0.0, 0.0]);
        assert!(close(ll, 15.0 / 105.0));
        assert!(close(lr, 15.0 / 105.0));
    }

    #[test]
    fn samples_behind_the_face_are_ignored() {
        let mut world = dark_world();
        world.set_light(Point3::new(0, 2, 1), LightChannel::Red, 15);
        world.set_light(Point3::new(1, 1, 0), LightChannel::Red, 15);

        assert_eq!(front_red(&world), [0.0; 4]);
    }
}
