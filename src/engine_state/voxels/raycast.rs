//! # Ray Cast Module
//!
//! Voxel picking by incremental grid traversal (Amanatides-Woo DDA). The ray walks
//! cell by cell, always crossing the nearest pending axis boundary, and stops at the
//! first solid voxel, at the world edge, or once it has travelled `max_distance`.

use cgmath::{InnerSpace, Point3, Vector3, Zero};

use super::block::Voxel;
use super::world::WorldGrid;

/// Why a ray cast stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RayOutcome {
    /// The ray entered a solid voxel.
    Hit(Voxel),
    /// The ray stepped outside the world before hitting anything.
    LeftWorld,
    /// The ray travelled its full distance through empty space.
    OutOfRange,
}

/// Result of [`WorldGrid::ray_cast`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayCastResult {
    /// Why the traversal stopped.
    pub outcome: RayOutcome,
    /// Last cell visited: the hit voxel, the first cell outside the world, or the
    /// cell reached when the distance ran out.
    pub voxel_coords: Point3<i32>,
    /// World-space point where the ray entered `voxel_coords`.
    pub end: Point3<f32>,
    /// Outward normal of the entered face. Zero if the ray never stepped or ran out of range.
    pub normal: Vector3<i32>,
}

impl RayCastResult {
    /// The voxel hit, if any.
    pub fn hit(&self) -> Option<Voxel> {
        match self.outcome {
            RayOutcome::Hit(voxel) => Some(voxel),
            _ => None,
        }
    }

    /// The empty cell in front of the hit face, where a placed voxel would go.
    pub fn adjacent(&self) -> Point3<i32> {
        self.voxel_coords + self.normal
    }
}

/// Per-axis traversal state.
struct Axis {
    cell: i32,
    step: i32,
    /// Ray distance between two boundary crossings on this axis.
    delta: f32,
    /// Ray distance at which the next boundary on this axis is crossed.
    next: f32,
}

impl Axis {
    fn new(position: f32, direction: f32) -> Self {
        let cell = position.floor() as i32;
        let step = if direction > 0.0 { 1 } else { -1 };
        if direction == 0.0 {
            return Axis {
                cell,
                step,
                delta: f32::INFINITY,
                next: f32::INFINITY,
            };
        }

        let delta = (1.0 / direction).abs();
        let to_boundary = if step > 0 {
            cell as f32 + 1.0 - position
        } else {
            position - cell as f32
        };
        Axis {
            cell,
            step,
            delta,
            next: delta * to_boundary,
        }
    }
}

/// Casts a ray through `world`.
///
/// `origin` is in world space. `max_distance` is measured in voxels.
pub fn ray_cast(
    world: &WorldGrid,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> RayCastResult {
    let voxel_size = world.voxel_size();
    let start = Point3::new(origin.x / voxel_size, origin.y / voxel_size, origin.z / voxel_size);
    let start_cell = Point3::new(
        start.x.floor() as i32,
        start.y.floor() as i32,
        start.z.floor() as i32,
    );

    if direction.magnitude2() == 0.0 {
        return RayCastResult {
            outcome: match world.get_voxel(start_cell) {
                None => RayOutcome::LeftWorld,
                Some(voxel) if voxel.is_solid() => RayOutcome::Hit(voxel),
                Some(_) => RayOutcome::OutOfRange,
            },
            voxel_coords: start_cell,
            end: origin,
            normal: Vector3::zero(),
        };
    }
    let direction = direction.normalize();

    let mut axes = [
        Axis::new(start.x, direction.x),
        Axis::new(start.y, direction.y),
        Axis::new(start.z, direction.z),
    ];
    let mut t = 0.0f32;
    let mut stepped: Option<usize> = None;

    let finish = |outcome, axes: &[Axis; 3], t: f32, stepped: Option<usize>| {
        let mut normal = Vector3::zero();
        if let Some(axis) = stepped {
            normal[axis] = -axes[axis].step;
        }
        let point = start + direction * t;
        RayCastResult {
            outcome,
            voxel_coords: Point3::new(axes[0].cell, axes[1].cell, axes[2].cell),
            end: Point3::new(point.x * voxel_size, point.y * voxel_size, point.z * voxel_size),
            normal,
        }
    };

    while t <= max_distance {
        let cell = Point3::new(axes[0].cell, axes[1].cell, axes[2].cell);
        match world.get_voxel(cell) {
            None => return finish(RayOutcome::LeftWorld, &axes, t, stepped),
            Some(voxel) if voxel.is_solid() => {
                return finish(RayOutcome::Hit(voxel), &axes, t, stepped)
            }
            Some(_) => {}
        }

        // Cross whichever boundary comes first; ties go to Z, then Y.
        let axis = if axes[0].next < axes[1].next {
            if axes[0].next < axes[2].next {
                0
            } else {
                2
            }
        } else if axes[1].next < axes[2].next {
            1
        } else {
            2
        };

        let current = &mut axes[axis];
        current.cell += current.step;
        t = current.next;
        current.next += current.delta;
        stepped = Some(axis);
    }

    finish(RayOutcome::OutOfRange, &axes, t, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn world_with_block(voxel_size: f32) -> WorldGrid {
        let config = WorldConfig {
            chunks: [2, 2, 2],
            chunk_size: [8, 8, 8],
            voxel_size,
            ..WorldConfig::default()
        };
        let mut world = WorldGrid::new(&config).unwrap();
        world.set_voxel(Point3::new(5, 5, 5), Voxel::new(1));
        world
    }

    #[test]
    fn hits_block_along_negative_z() {
        let world = world_with_block(1.0);
        let result = world.ray_cast(Point3::new(5.5, 5.5, 10.5), Vector3::new(0.0, 0.0, -1.0), 20.0);

        assert_eq!(result.outcome, RayOutcome::Hit(Voxel::new(1)));
        assert_eq!(result.voxel_coords, Point3::new(5, 5, 5));
        assert_eq!(result.normal, Vector3::new(0, 0, 1));
        assert_eq!(result.adjacent(), Point3::new(5, 5, 6));
        assert!((result.end.z - 6.0).abs() < 1e-5);
    }

    #[test]
    fn integer_origin_hits_after_four_steps() {
        let world = world_with_block(1.0);
        let hit = world.ray_cast(Point3::new(5.0, 5.0, 10.0), Vector3::new(0.0, 0.0, -1.0), 4.0);
        assert_eq!(hit.hit(), Some(Voxel::new(1)));

        let miss = world.ray_cast(Point3::new(5.0, 5.0, 10.0), Vector3::new(0.0, 0.0, -1.0), 3.0);
        assert_eq!(miss.outcome, RayOutcome::OutOfRange);
        assert_eq!(miss.hit(), None);
        assert_eq!(miss.normal, Vector3::zero());
    }

    #[test]
    fn direction_is_normalized() {
        let world = world_with_block(1.0);
        let result = world.ray_cast(Point3::new(5.5, 5.5, 10.5), Vector3::new(0.0, 0.0, -7.0), 20.0);
        assert_eq!(result.voxel_coords, Point3::new(5, 5, 5));
    }

    #[test]
    fn hits_from_below() {
        let world = world_with_block(1.0);
        let result = world.ray_cast(Point3::new(5.5, 0.5, 5.5), Vector3::new(0.0, 1.0, 0.0), 20.0);
        assert_eq!(result.voxel_coords, Point3::new(5, 5, 5));
        assert_eq!(result.normal, Vector3::new(0, -1, 0));
    }

    #[test]
    fn stops_at_world_edge() {
        let world = world_with_block(1.0);
        let result = world.ray_cast(Point3::new(1.5, 1.5, 1.5), Vector3::new(-1.0, 0.0, 0.0), 100.0);
        assert_eq!(result.outcome, RayOutcome::LeftWorld);
        assert_eq!(result.voxel_coords, Point3::new(-1, 1, 1));
        assert_eq!(result.normal, Vector3::new(1, 0, 0));
    }

    #[test]
    fn scales_with_voxel_size() {
        let world = world_with_block(0.5);
        let result = world.ray_cast(Point3::new(2.75, 2.75, 5.25), Vector3::new(0.0, 0.0, -1.0), 20.0);
        assert_eq!(result.voxel_coords, Point3::new(5, 5, 5));
        assert!((result.end.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn zero_direction_reports_start_cell() {
        let world = world_with_block(1.0);
        let result = world.ray_cast(Point3::new(5.5, 5.5, 5.5), Vector3::zero(), 10.0);
        assert_eq!(result.hit(), Some(Voxel::new(1)));
        assert_eq!(result.voxel_coords, Point3::new(5, 5, 5));
    }
}
