//! Planar 2-bit tiles as stored in CHR memory
//!
//! A tile is 8x8 pixels with a 2-bit palette index per pixel. The index is
//! split across two planes of eight bytes each: byte `r` of a plane is pixel
//! row `r`, and bit `7 - x` of that byte carries one bit of pixel `x`.

/// Width and height of a tile in pixels
pub const TILE_PIXELS: usize = 8;

/// Size of one encoded tile in bytes
pub const TILE_BYTES: usize = 2 * TILE_PIXELS;

/// One bit-significance layer of a tile, one byte per pixel row
pub type Plane = [u8; TILE_PIXELS];

/// An 8x8 two-plane tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    planes: [Plane; 2],
}

impl Tile {
    /// Build a tile from its low and high bit planes
    pub const fn new(low: Plane, high: Plane) -> Self {
        Self {
            planes: [low, high],
        }
    }

    /// Decode a tile from its CHR encoding (plane 0 then plane 1)
    pub fn from_bytes(bytes: &[u8; TILE_BYTES]) -> Self {
        let mut planes = [[0; TILE_PIXELS]; 2];
        for (plane, chunk) in planes.iter_mut().zip(bytes.chunks_exact(TILE_PIXELS)) {
            plane.copy_from_slice(chunk);
        }
        Self { planes }
    }

    /// Encode the tile as 16 CHR bytes
    pub fn to_bytes(&self) -> [u8; TILE_BYTES] {
        let mut bytes = [0; TILE_BYTES];
        for (chunk, plane) in bytes.chunks_exact_mut(TILE_PIXELS).zip(&self.planes) {
            chunk.copy_from_slice(plane);
        }
        bytes
    }

    /// Pack a row-major grid of palette indices into planes
    ///
    /// Only the two low bits of each index are kept.
    pub fn from_indices(pixels: &[[u8; TILE_PIXELS]; TILE_PIXELS]) -> Self {
        let mut planes = [[0; TILE_PIXELS]; 2];
        for (row, line) in pixels.iter().enumerate() {
            for (x, &pixel) in line.iter().enumerate() {
                let shift = TILE_PIXELS - 1 - x;
                for (bit, plane) in planes.iter_mut().enumerate() {
                    if let Some(byte) = plane.get_mut(row) {
                        *byte |= ((pixel >> bit) & 1) << shift;
                    }
                }
            }
        }
        Self { planes }
    }

    /// Palette index of the pixel at column `x`, row `y` (0 outside the tile)
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        if x >= TILE_PIXELS {
            return 0;
        }
        let shift = TILE_PIXELS - 1 - x;
        self.planes
            .iter()
            .enumerate()
            .map(|(bit, plane)| plane.get(y).map_or(0, |byte| ((byte >> shift) & 1) << bit))
            .sum()
    }

    /// Both planes, low bit first
    pub const fn planes(&self) -> &[Plane; 2] {
        &self.planes
    }

    /// True when every pixel uses palette index 0
    pub fn is_empty(&self) -> bool {
        self.planes.iter().flatten().all(|&byte| byte == 0)
    }

    /// Horizontal mirror image of this tile
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            planes: self.planes.map(|plane| plane.map(u8::reverse_bits)),
        }
    }

    /// Vertical flip of this tile
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            planes: self.planes.map(|mut plane| {
                plane.reverse();
                plane
            }),
        }
    }

    /// True when `self` is `other` mirrored horizontally
    pub fn is_mirror_of(&self, other: &Self) -> bool {
        self.planes
            .iter()
            .flatten()
            .zip(other.planes.iter().flatten())
            .all(|(&a, &b)| a == b.reverse_bits())
    }

    /// True when `self` is `other` flipped vertically
    pub fn is_flip_of(&self, other: &Self) -> bool {
        self.planes
            .iter()
            .zip(&other.planes)
            .all(|(a, b)| a.iter().eq(b.iter().rev()))
    }

    /// True when `self` is `other` both mirrored and flipped
    pub fn is_mirror_flip_of(&self, other: &Self) -> bool {
        self.planes.iter().zip(&other.planes).all(|(a, b)| {
            a.iter()
                .zip(b.iter().rev())
                .all(|(&x, &y)| x == y.reverse_bits())
        })
    }
}

impl From<[u8; TILE_BYTES]> for Tile {
    fn from(bytes: [u8; TILE_BYTES]) -> Self {
        Self::from_bytes(&bytes)
    }
}
