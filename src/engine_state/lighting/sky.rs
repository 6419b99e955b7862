//! Initial light sources: open sky columns and emitting voxels.

use cgmath::Point3;
use log::debug;

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::block_type::MAX_LIGHT_LEVEL;
use crate::engine_state::voxels::lightmap::LightChannel;
use crate::engine_state::voxels::world::WorldGrid;

use super::LightSolver;

/// Floods sky light into every column open to the top of the world.
///
/// Each `(x, z)` column is lit at full level from the top down to its first solid
/// voxel. Lit voxels bordering a dark voxel are then queued so the light spreads
/// sideways under overhangs, and the solver is run.
pub fn seed_sky_light(world: &mut WorldGrid, solver: &mut LightSolver) {
    debug_assert_eq!(solver.channel(), LightChannel::Sky);
    let extent = world.extent();
    let mut lit = Vec::new();

    for z in 0..extent.z {
        for x in 0..extent.x {
            for y in (0..extent.y).rev() {
                let coords = Point3::new(x, y, z);
                if world.is_blocked(coords) {
                    break;
                }
                world.set_light(coords, LightChannel::Sky, MAX_LIGHT_LEVEL);
                lit.push(coords);
            }
        }
    }

    let mut frontier = 0;
    for coords in &lit {
        let borders_dark = BlockSide::all().into_iter().any(|side| {
            world.get_light(*coords + side.normal(), LightChannel::Sky) == 0
        });
        if borders_dark {
            solver.add(world, *coords);
            frontier += 1;
        }
    }

    let stats = solver.solve(world);
    debug!(
        "Seeded sky light: {} open voxels, {} frontier, {} propagated",
        lit.len(),
        frontier,
        stats.added
    );
}

/// Lights every emitting voxel at its emission level on the red, green and blue
/// solvers and runs them.
///
/// `solvers` holds one solver per block-light channel, in [`LightChannel::RGB`] order.
pub fn seed_emitters(world: &mut WorldGrid, solvers: &mut [LightSolver; 3]) {
    let mut emitters = Vec::new();
    world.for_each_voxel(|coords, voxel| {
        let emission = voxel.kind().map_or(0, |kind| kind.rgb_emission());
        if emission > 0 {
            emitters.push((coords, emission));
        }
    });

    for solver in solvers.iter_mut() {
        for &(coords, emission) in &emitters {
            solver.add_emission(world, coords, emission);
        }
        solver.solve(world);
    }
    debug!("Seeded {} light emitters", emitters.len());
}
