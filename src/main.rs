//! # Voxel Light Entry Point
//!
//! Runs a short session against a generated world and logs what happened.
//! It simply calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info VOXEL_LIGHT_CONFIG=world.json cargo run --release
//! ```

fn main() {
    voxel_light::run();
}
