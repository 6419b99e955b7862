//! # Block Module
//!
//! This module provides the voxel value stored in every cell of the world, the
//! well-known voxel kinds, and the six faces of a voxel cube.

pub mod block_side;
pub mod block_type;

use block_type::VoxelKind;

/// The underlying integer type used to identify voxel materials.
///
/// `0` is air; any other value selects a tile in the texture atlas.
pub type VoxelId = u16;

/// Represents a single voxel in the world.
///
/// A voxel carries only its material identifier: no orientation and no extra state.
/// Light lives alongside it in the owning chunk's lightmap.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the layout identical to a bare `VoxelId`, so a
/// chunk's voxel array can be viewed as raw identifiers.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Voxel {
    /// Material identifier, `0` meaning empty.
    pub id: VoxelId,
}

impl Voxel {
    /// The empty voxel.
    pub const AIR: Voxel = Voxel { id: 0 };

    /// Creates a voxel with the given identifier.
    pub const fn new(id: VoxelId) -> Self {
        Voxel { id }
    }

    /// Creates a voxel of a well-known kind.
    pub fn of_kind(kind: VoxelKind) -> Self {
        Voxel { id: kind as VoxelId }
    }

    /// Whether this voxel occupies its cell. Any non-zero identifier is solid.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.id != 0
    }

    /// The well-known kind of this voxel, if it has one.
    pub fn kind(&self) -> Option<VoxelKind> {
        VoxelKind::from_id(self.id)
    }
}

impl From<VoxelId> for Voxel {
    fn from(id: VoxelId) -> Self {
        Voxel { id }
    }
}
