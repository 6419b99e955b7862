//! Texture atlas lookup.
//!
//! The mesher only needs one thing from textures: which normalized sub-rectangle of
//! the atlas a voxel face samples. [`TextureAtlas`] is that seam; [`StripAtlas`] is
//! the default layout of square tiles in one horizontal row.

use std::collections::HashMap;

use crate::config::AtlasConfig;
use crate::engine_state::voxels::block::{block_side::BlockSide, Voxel, VoxelId};

/// A normalized rectangle in texture space. `(u0, v0)` is the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AtlasRect {
    /// Left edge.
    pub u0: f32,
    /// Top edge.
    pub v0: f32,
    /// Right edge.
    pub u1: f32,
    /// Bottom edge.
    pub v1: f32,
}

/// Maps a voxel face to the part of the atlas it is textured with.
///
/// Implementations must be pure: the same voxel and side always give the same rect.
pub trait TextureAtlas {
    /// The texture rectangle for one face of `voxel`.
    fn uv_rect(&self, voxel: Voxel, side: BlockSide) -> AtlasRect;
}

/// Square tiles laid out left to right; voxel id `n` uses tile `n - 1`.
///
/// Individual faces can be pointed at other tiles, for example to give a block a
/// distinct top texture.
///
/// # Examples
///
/// ```
/// use voxel_light::{AtlasConfig, BlockSide, StripAtlas, TextureAtlas, Voxel};
///
/// let atlas = StripAtlas::new(AtlasConfig { tile_size: 16.0, width: 64.0, height: 16.0 })
///     .with_override(1, BlockSide::TOP, 3);
///
/// let side = atlas.uv_rect(Voxel::new(2), BlockSide::FRONT);
/// assert_eq!((side.u0, side.u1), (0.25, 0.5));
/// let top = atlas.uv_rect(Voxel::new(1), BlockSide::TOP);
/// assert_eq!((top.u0, top.u1), (0.75, 1.0));
/// ```
#[derive(Clone, Debug)]
pub struct StripAtlas {
    config: AtlasConfig,
    overrides: HashMap<(VoxelId, BlockSide), u16>,
}

impl StripAtlas {
    /// Creates an atlas with the given layout and no per-face overrides.
    pub fn new(config: AtlasConfig) -> Self {
        StripAtlas {
            config,
            overrides: HashMap::new(),
        }
    }

    /// Textures one side of voxel `id` with `tile` instead of its default tile.
    pub fn with_override(mut self, id: VoxelId, side: BlockSide, tile: u16) -> Self {
        self.overrides.insert((id, side), tile);
        self
    }

    /// The rectangle covered by a tile index.
    pub fn tile_rect(&self, tile: u16) -> AtlasRect {
        let AtlasConfig {
            tile_size,
            width,
            height,
        } = self.config;
        let x = tile as f32 * tile_size;
        AtlasRect {
            u0: x / width,
            v0: 0.0,
            u1: (x + tile_size) / width,
            v1: tile_size / height,
        }
    }
}

impl TextureAtlas for StripAtlas {
    fn uv_rect(&self, voxel: Voxel, side: BlockSide) -> AtlasRect {
        let tile = self
            .overrides
            .get(&(voxel.id, side))
            .copied()
            .unwrap_or_else(|| voxel.id.saturating_sub(1));
        self.tile_rect(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_maps_ids_to_tiles() {
        let atlas = StripAtlas::new(AtlasConfig::default());
        let first = atlas.uv_rect(Voxel::new(1), BlockSide::FRONT);
        assert_eq!(first, AtlasRect { u0: 0.0, v0: 0.0, u1: 0.0625, v1: 1.0 });

        let third = atlas.uv_rect(Voxel::new(3), BlockSide::LEFT);
        assert_eq!(third.u0, 0.125);
        assert_eq!(third.u1, 0.1875);
    }

    #[test]
    fn overrides_apply_to_one_side() {
        let atlas = StripAtlas::new(AtlasConfig::default()).with_override(2, BlockSide::TOP, 7);
        assert_eq!(atlas.uv_rect(Voxel::new(2), BlockSide::TOP), atlas.tile_rect(7));
        assert_eq!(atlas.uv_rect(Voxel::new(2), BlockSide::BOTTOM), atlas.tile_rect(1));
    }
}
