#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Light
//!
//! A chunked voxel world with incremental multi-channel flood-fill lighting, face
//! meshing with smooth per-corner light, and ray picking.
//!
//! ## Key Modules
//!
//! * `config` - World parameters, loadable from JSON
//! * `engine_state` - The world, light solvers, meshing and the per-tick pipeline
//! * `error` - Construction-time errors
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * Voxel storage (chunks owned by one world grid, addressed by index)
//! * Light propagation (one solver per channel, driven by edits)
//! * Geometry production (chunk meshes handed to an external sink)
//!
//! Rendering, windowing and input stay outside the crate. The crate consumes a
//! texture atlas lookup and voxel edits, and produces chunk meshes.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_light::{EngineState, MeshCache, VoxelEdit, WorldConfig};
//!
//! let config = WorldConfig { chunks: [2, 1, 2], chunk_size: [8, 8, 8], ..WorldConfig::default() };
//! let mut engine = EngineState::new(&config).unwrap();
//! let mut meshes = MeshCache::new();
//!
//! engine.tick(&mut meshes);
//! engine.queue_edit(VoxelEdit::new(Point3::new(4, 7, 4), 3));
//! engine.tick(&mut meshes);
//! ```

use cgmath::{Point3, Vector3};
use log::{error, info};

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::{AtlasConfig, GenerationMethod, SmoothLighting, WorldConfig};
pub use engine_state::{
    lighting::{seed_emitters, seed_sky_light, LightEntry, LightQueue, LightSolver, SolveStats},
    rendering::{
        AtlasRect, ChunkMesh, ChunkMesher, GeometrySink, MeshCache, StripAtlas, TextureAtlas,
        VoxelVertex,
    },
    voxels::{
        block::{block_side::BlockSide, block_type::VoxelKind, Voxel, VoxelId},
        chunk::{Chunk, ChunkGenerator},
        lightmap::{LightChannel, PackedLight},
        raycast::{RayCastResult, RayOutcome},
        world::WorldGrid,
    },
    EngineState, TickReport, VoxelEdit,
};
pub use error::WorldError;

/// Environment variable naming a JSON world configuration for [`run`].
pub const CONFIG_PATH_VARIABLE: &str = "VOXEL_LIGHT_CONFIG";

/// Initializes logging, builds a world and runs a short pick-and-edit session on it.
///
/// The configuration is read from the path in [`CONFIG_PATH_VARIABLE`] when set,
/// otherwise defaults are used. Failures are logged.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(err) = run_session() {
        error!("{}", err);
    }
}

fn run_session() -> Result<(), WorldError> {
    let config = match std::env::var(CONFIG_PATH_VARIABLE) {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            WorldConfig::load(path)?
        }
        Err(_) => WorldConfig::default(),
    };

    let mut engine = EngineState::new(&config)?;
    let mut meshes = MeshCache::new();
    engine.tick(&mut meshes);
    info!(
        "Initial meshes: {} chunks, {} faces",
        meshes.len(),
        meshes.total_faces()
    );

    // Look straight down the middle of the world, dig out the surface and drop a lamp in.
    let extent = engine.world().extent();
    let voxel_size = engine.world().voxel_size();
    let origin = Point3::new(
        extent.x as f32 * 0.5 * voxel_size,
        (extent.y as f32 - 0.5) * voxel_size,
        extent.z as f32 * 0.5 * voxel_size,
    );
    let down = Vector3::new(0.0, -1.0, 0.0);

    let hit = engine.pick(origin, down, extent.y as f32);
    if hit.hit().is_none() {
        info!("Nothing below {:?}", origin);
        return Ok(());
    }
    info!("Picked {:?} at {:?}", hit.hit(), hit.voxel_coords);

    engine.queue_edit(VoxelEdit::new(hit.voxel_coords, 0));
    let report = engine.tick(&mut meshes);
    info!("Break: {:?}", report);

    let hit = engine.pick(origin, down, extent.y as f32);
    if let Some(target) = EngineState::place_target(&hit) {
        engine.queue_edit(VoxelEdit::new(target, VoxelKind::Lamp as VoxelId));
        let report = engine.tick(&mut meshes);
        info!(
            "Lamp at {:?}: red light {}, {:?}",
            target,
            engine.world().get_light(target, LightChannel::Red),
            report
        );
    }

    Ok(())
}
