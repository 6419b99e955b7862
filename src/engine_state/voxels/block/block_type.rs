//! # Block Type Module
//!
//! Well-known voxel identifiers and the light each one emits.
//! Identifiers outside this list are still valid solid voxels; they simply have no
//! special behavior.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::VoxelId;

/// Maximum level a light channel can hold.
pub const MAX_LIGHT_LEVEL: u8 = 15;

/// Enumerates the voxel kinds the engine gives special meaning to.
///
/// The `FromPrimitive` derive allows conversion from raw identifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum VoxelKind {
    /// Empty space. Transparent to light, never meshed.
    Air = 0,

    /// Generic terrain material.
    Stone = 1,

    /// The floor layer laid down by terrain generation.
    Bedrock = 2,

    /// Emits full-intensity white light on the red, green and blue channels.
    Lamp = 3,
}

impl VoxelKind {
    /// Looks up the kind for a raw identifier.
    ///
    /// # Returns
    /// `None` for identifiers without special meaning.
    pub fn from_id(id: VoxelId) -> Option<Self> {
        <Self as FromPrimitive>::from_u16(id)
    }

    /// Light emitted on the red, green and blue channels, `0` for non-emitters.
    pub fn rgb_emission(&self) -> u8 {
        match self {
            VoxelKind::Lamp => MAX_LIGHT_LEVEL,
            _ => 0,
        }
    }
}
