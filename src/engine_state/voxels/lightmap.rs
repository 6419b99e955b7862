//! # Lightmap Module
//!
//! Per-chunk light storage. Each voxel owns one 16-bit word holding four 4-bit
//! channels (red, green, blue, sky). The bit layout is private to [`PackedLight`];
//! everything else reads and writes channels by [`LightChannel`], so the packing
//! can change without touching the solver or the mesher.

use super::block::block_type::MAX_LIGHT_LEVEL;

/// One of the four independent light channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LightChannel {
    /// Red block light.
    Red = 0,
    /// Green block light.
    Green = 1,
    /// Blue block light.
    Blue = 2,
    /// Light from the open sky.
    Sky = 3,
}

impl LightChannel {
    /// All channels in storage order.
    pub const ALL: [LightChannel; 4] = [
        LightChannel::Red,
        LightChannel::Green,
        LightChannel::Blue,
        LightChannel::Sky,
    ];

    /// The block-light channels fed by emitting voxels.
    pub const RGB: [LightChannel; 3] = [LightChannel::Red, LightChannel::Green, LightChannel::Blue];

    /// Position of this channel in storage order.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Four 4-bit light channels packed into one word.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedLight(u16);

impl PackedLight {
    const CHANNEL_BITS: u16 = 4;
    const CHANNEL_MASK: u16 = 0xF;

    /// Reads one channel.
    #[inline]
    pub fn get_channel(&self, channel: LightChannel) -> u8 {
        ((self.0 >> Self::shift(channel)) & Self::CHANNEL_MASK) as u8
    }

    /// Writes one channel, saturating at the maximum level.
    #[inline]
    pub fn set_channel(&mut self, channel: LightChannel, value: u8) {
        let shift = Self::shift(channel);
        let value = value.min(MAX_LIGHT_LEVEL) as u16;
        self.0 = (self.0 & !(Self::CHANNEL_MASK << shift)) | (value << shift);
    }

    #[inline]
    fn shift(channel: LightChannel) -> u16 {
        channel as u16 * Self::CHANNEL_BITS
    }
}

/// Light levels for every voxel in one chunk, indexed like the chunk's voxel array.
#[derive(Clone, Debug)]
pub struct Lightmap {
    map: Vec<PackedLight>,
}

impl Lightmap {
    /// Creates a fully dark lightmap for `len` voxels.
    pub fn new(len: usize) -> Self {
        Lightmap {
            map: vec![PackedLight::default(); len],
        }
    }

    /// Number of voxels covered.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the lightmap covers no voxels.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Reads a channel at a linear voxel index.
    ///
    /// # Panics
    /// Panics if `index` is outside the chunk.
    #[inline]
    pub fn get(&self, index: usize, channel: LightChannel) -> u8 {
        self.map[index].get_channel(channel)
    }

    /// Writes a channel at a linear voxel index, saturating at the maximum level.
    ///
    /// # Panics
    /// Panics if `index` is outside the chunk.
    #[inline]
    pub fn set(&mut self, index: usize, channel: LightChannel, value: u8) {
        self.map[index].set_channel(channel, value);
    }
}
