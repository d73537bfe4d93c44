//! Ordered sprite placement lists
//!
//! Every sprite points into a tile table by position, so any removal from
//! the table must be followed by [`Metasprite::remap_after_removal`] on every
//! metasprite sharing that table. Keeping the rewrite in one method keeps the
//! "identity is position" rule enforced at a single call site.

use crate::chr::sprite::{Sprite, SpriteFlags};
use crate::chr::table::{TileLayout, TileTable};
use crate::chr::tile::TILE_PIXELS;
use crate::io::configuration::{GRID_COLUMNS, GRID_ROWS, MAX_TILE_REFERENCES};
use crate::io::error::{ChrError, Result};
use std::cmp::Ordering;

/// What happens to sprites that pointed at a removed tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remap {
    /// Delete them; the tile had no surviving equivalent
    Drop,
    /// Point them at an equivalent tile, toggling the transform bits needed
    /// to render it as the removed one
    Redirect {
        /// Position of the surviving tile (always below the removed one)
        index: usize,
        /// Attribute bits to toggle
        flags: SpriteFlags,
    },
}

/// Ordered sprite list; order is render order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metasprite {
    sprites: Vec<Sprite>,
}

impl Metasprite {
    /// Create an empty metasprite
    pub const fn new() -> Self {
        Self {
            sprites: Vec::new(),
        }
    }

    /// Create a metasprite from existing sprites
    pub const fn with_sprites(sprites: Vec<Sprite>) -> Self {
        Self { sprites }
    }

    /// One sprite per cell of a 16-column grid table
    ///
    /// The origin is the bottom-left corner of the grid: cell `(row, col)`
    /// is placed at `x = col * 8 + dx`, `y = (row - rows) * 8 + dy`. Offsets
    /// wrap like the 8-bit hardware coordinates they describe.
    pub fn from_grid(table: &TileTable, offset: (i8, i8), palette: u8) -> Self {
        let (dx, dy) = offset;
        let rows = (table.len() / GRID_COLUMNS).min(GRID_ROWS);
        let flags = SpriteFlags::with_palette(palette);
        let pixels = TILE_PIXELS as i32;

        let mut sprites = Vec::with_capacity(rows * GRID_COLUMNS);
        for row in 0..rows {
            for col in 0..GRID_COLUMNS {
                let x = (col as i32 * pixels) as i8;
                let y = ((row as i32 - rows as i32) * pixels) as i8;
                sprites.push(Sprite::new(
                    x.wrapping_add(dx),
                    y.wrapping_add(dy),
                    (row * GRID_COLUMNS + col) as u8,
                    flags,
                ));
            }
        }

        Self { sprites }
    }

    /// Number of sprites
    pub const fn len(&self) -> usize {
        self.sprites.len()
    }

    /// True when there are no sprites
    pub const fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprite at `index`
    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    /// All sprites in render order
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Iterate sprites in render order
    pub fn iter(&self) -> std::slice::Iter<'_, Sprite> {
        self.sprites.iter()
    }

    /// Append a sprite
    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Remove the sprite at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds
    pub fn remove_at(&mut self, index: usize) -> Sprite {
        self.sprites.remove(index)
    }

    /// Move every sprite of `other` onto the end of this metasprite
    pub fn append(&mut self, other: &mut Self) {
        self.sprites.append(&mut other.sprites);
    }

    /// Rewrite tile indices after the unit at `removed` left the table
    ///
    /// Sprites on `removed` are handled by `remap`; sprites above it move
    /// down by `stride`. A redirect target always lies below `removed`, so
    /// every rewritten index stays within the sprite's tile field. Returns
    /// the number of sprites dropped.
    pub fn remap_after_removal(&mut self, removed: usize, stride: usize, remap: Remap) -> usize {
        let before = self.sprites.len();
        self.sprites.retain_mut(|sprite| {
            let position = sprite.position();
            match position.cmp(&removed) {
                Ordering::Less => true,
                Ordering::Greater => {
                    debug_assert!(position >= removed + stride);
                    sprite.tile -= stride as u8;
                    true
                }
                Ordering::Equal => match remap {
                    Remap::Drop => false,
                    Remap::Redirect { index, flags } => {
                        debug_assert!(index < removed);
                        sprite.tile = index as u8;
                        sprite.flags.toggle(flags);
                        true
                    }
                },
            }
        });
        before - self.sprites.len()
    }

    /// Shift every tile index up by `offset`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` if a shifted index no longer fits in a
    /// sprite's 8-bit tile field; the metasprite is left unchanged.
    pub fn bias(&mut self, offset: usize) -> Result<()> {
        let biased = self
            .sprites
            .iter()
            .map(|sprite| {
                let index = sprite.position() + offset;
                u8::try_from(index)
                    .ok()
                    .ok_or(ChrError::InvalidTileIndex {
                        index,
                        max_tiles: MAX_TILE_REFERENCES,
                    })
            })
            .collect::<Result<Vec<u8>>>()?;

        for (sprite, tile) in self.sprites.iter_mut().zip(biased) {
            sprite.tile = tile;
        }
        Ok(())
    }

    /// Convert grid placements to 8x16 units
    ///
    /// Sprites on odd grid rows are dropped since the unit above now covers
    /// them, and the rest are re-pointed at the paired layout produced by
    /// [`TileTable::to_paired`].
    pub fn to_paired(&mut self) {
        let columns = GRID_COLUMNS as u8;
        self.sprites
            .retain(|sprite| (sprite.tile / columns) % 2 == 0);
        for sprite in &mut self.sprites {
            sprite.tile = (sprite.tile / columns) * columns + (sprite.tile % columns) * 2;
        }
    }

    /// Check every sprite references a valid unit of `table`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` for an index past the end of the table and
    /// `InvalidSourceData` for an index splitting an 8x16 pair.
    pub fn validate(&self, table: &TileTable) -> Result<()> {
        for (number, sprite) in self.sprites.iter().enumerate() {
            let position = sprite.position();
            if position >= table.len() {
                return Err(ChrError::InvalidTileIndex {
                    index: position,
                    max_tiles: table.len(),
                });
            }
            if table.layout() == TileLayout::Paired && position % 2 != 0 {
                return Err(ChrError::InvalidSourceData {
                    reason: format!(
                        "sprite {number} references tile {position}, the bottom half of an 8x16 unit"
                    ),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Metasprite {
    type Item = &'a Sprite;
    type IntoIter = std::slice::Iter<'a, Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}

impl FromIterator<Sprite> for Metasprite {
    fn from_iter<I: IntoIterator<Item = Sprite>>(iter: I) -> Self {
        Self {
            sprites: iter.into_iter().collect(),
        }
    }
}
