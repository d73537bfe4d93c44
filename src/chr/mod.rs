//! CHR data structures and tile canonicalization
//!
//! This module contains the in-memory model of a CHR bank:
//! - Planar tiles and their geometric relations
//! - Tile tables in 8x8 or 8x16 layout
//! - Sprite placements and metasprites referencing the table
//! - The cleanup engine removing blank and redundant tiles

/// Blank and duplicate tile removal, plus bank concatenation
pub mod cleanup;
/// Priority-ordered geometric matching between tiles and tile pairs
pub mod matching;
/// Ordered sprite placement lists with index remapping
pub mod metasprite;
/// Single sprite placement records and their attribute flags
pub mod sprite;
/// Ordered tile collections with 8x8 and 8x16 layouts
pub mod table;
/// Two-plane 8x8 tile bitmaps
pub mod tile;

pub use cleanup::{CleanupReport, TileBank, canonicalize};
pub use matching::{MatchOptions, TileMatch};
pub use metasprite::{Metasprite, Remap};
pub use sprite::{Sprite, SpriteFlags};
pub use table::{TileLayout, TileTable};
pub use tile::Tile;
