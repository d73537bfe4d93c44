//! Ordered tile collections
//!
//! Position is the only identity a tile has. Removing a tile shifts every
//! later tile down by one, so callers holding indices into the table must
//! remap them (see [`crate::chr::metasprite::Metasprite::remap_after_removal`]).

use crate::chr::tile::Tile;
use crate::io::configuration::{GRID_COLUMNS, GRID_ROWS};

/// How consecutive tiles are grouped into addressable units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileLayout {
    /// Every tile is an independent 8x8 unit
    #[default]
    Single,
    /// Tiles `(2k, 2k + 1)` form one 8x16 unit, top half first
    Paired,
}

impl TileLayout {
    /// Number of tiles per addressable unit
    pub const fn stride(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Paired => 2,
        }
    }

    /// Unit height in pixels
    pub const fn tile_height(self) -> u8 {
        match self {
            Self::Single => 8,
            Self::Paired => 16,
        }
    }

    /// Layout for a unit height of 8 or 16 pixels
    pub const fn from_tile_height(height: u8) -> Option<Self> {
        match height {
            8 => Some(Self::Single),
            16 => Some(Self::Paired),
            _ => None,
        }
    }
}

/// Ordered, mutable tile table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileTable {
    tiles: Vec<Tile>,
    layout: TileLayout,
}

impl TileTable {
    /// Create an empty table
    pub const fn new(layout: TileLayout) -> Self {
        Self {
            tiles: Vec::new(),
            layout,
        }
    }

    /// Create a table from existing tiles
    pub const fn with_tiles(tiles: Vec<Tile>, layout: TileLayout) -> Self {
        Self { tiles, layout }
    }

    /// Grouping of tiles into units
    pub const fn layout(&self) -> TileLayout {
        self.layout
    }

    /// Number of 8x8 tiles (not units)
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when the table holds no tiles
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at `index`
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// All tiles in order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterate tiles in order
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Append a tile
    pub fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    /// Remove the tile at `index`, shifting later tiles down by one
    ///
    /// In paired layout callers remove both halves, bottom half first.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds. Indices reaching this point come
    /// from the table's own iteration, so an invalid one is a logic error.
    pub fn remove_at(&mut self, index: usize) -> Tile {
        self.tiles.remove(index)
    }

    /// Move every tile of `other` onto the end of this table
    pub fn append(&mut self, other: &mut Self) {
        self.tiles.append(&mut other.tiles);
    }

    /// Reorder a 16-column grid table into 8x16 pairs
    ///
    /// For every even row `r` and column `c`, tile `(r, c)` and the tile
    /// below it `(r + 1, c)` become consecutive, so `(r, c)` lands at
    /// `r * 16 + 2c`. A missing bottom row is padded with blank tiles.
    pub fn to_paired(&mut self) {
        if self.layout == TileLayout::Paired {
            return;
        }

        let rows = self.tiles.len().div_ceil(GRID_COLUMNS);
        let mut paired = Vec::with_capacity(rows.next_multiple_of(2) * GRID_COLUMNS);
        for row in (0..rows).step_by(2) {
            for col in 0..GRID_COLUMNS {
                let top = row * GRID_COLUMNS + col;
                let bottom = top + GRID_COLUMNS;
                paired.push(self.tiles.get(top).copied().unwrap_or_default());
                paired.push(self.tiles.get(bottom).copied().unwrap_or_default());
            }
        }

        self.tiles = paired;
        self.layout = TileLayout::Paired;
    }

    /// A blank table covering the full 16x16 sprite grid
    pub fn blank_grid() -> Self {
        Self::with_tiles(
            vec![Tile::default(); GRID_ROWS * GRID_COLUMNS],
            TileLayout::Single,
        )
    }

    /// Mutable access to the tile at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }
}

impl<'a> IntoIterator for &'a TileTable {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
