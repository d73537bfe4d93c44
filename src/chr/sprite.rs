//! Single sprite placement records
//!
//! A sprite places one tile unit on screen relative to the metasprite origin.
//! Its attribute byte follows the NES OAM layout: the two low bits select the
//! sprite palette, bit 6 mirrors horizontally and bit 7 flips vertically.

use bitflags::bitflags;
use std::fmt;

/// Encoded size of one sprite record in bytes
pub const SPRITE_BYTES: usize = 4;

bitflags! {
    /// Render-time attributes attached to a sprite
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SpriteFlags: u8 {
        /// Sprite palette selector (bits 0-1)
        const PALETTE = 0b0000_0011;
        /// Mirror the tile horizontally
        const MIRROR = 0b0100_0000;
        /// Flip the tile vertically
        const FLIP = 0b1000_0000;
    }
}

impl SpriteFlags {
    /// Flags selecting palette `palette` (only the two low bits are used)
    pub const fn with_palette(palette: u8) -> Self {
        Self::from_bits_retain(palette & Self::PALETTE.bits())
    }

    /// Palette selected by these flags
    pub const fn palette(self) -> u8 {
        self.bits() & Self::PALETTE.bits()
    }
}

/// One placement of a tile unit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sprite {
    /// Horizontal offset from the metasprite origin
    pub x: i8,
    /// Vertical offset from the metasprite origin (negative is up)
    pub y: i8,
    /// Index of the tile unit in the associated tile table
    pub tile: u8,
    /// Palette and transform attributes
    pub flags: SpriteFlags,
}

impl Sprite {
    /// Create a sprite
    pub const fn new(x: i8, y: i8, tile: u8, flags: SpriteFlags) -> Self {
        Self { x, y, tile, flags }
    }

    /// Encode as `[x, y, tile, flags]`
    pub const fn to_bytes(self) -> [u8; SPRITE_BYTES] {
        [
            self.x.cast_unsigned(),
            self.y.cast_unsigned(),
            self.tile,
            self.flags.bits(),
        ]
    }

    /// Decode from `[x, y, tile, flags]`
    pub const fn from_bytes(bytes: [u8; SPRITE_BYTES]) -> Self {
        let [x, y, tile, flags] = bytes;
        Self {
            x: x.cast_signed(),
            y: y.cast_signed(),
            tile,
            flags: SpriteFlags::from_bits_retain(flags),
        }
    }

    /// Tile index as a table position
    pub fn position(self) -> usize {
        usize::from(self.tile)
    }
}

/// Formats the four fields the way the text exporters emit them
impl fmt::Display for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, 0x{:x}, {}",
            self.x,
            self.y,
            self.tile,
            self.flags.bits()
        )
    }
}
