//! Converts palette-indexed images into NES CHR tiles and metasprites
//!
//! Images are rasterized into 2-bit planar 8x8 tiles, then a canonicalization
//! pass drops blank tiles and folds tiles that are equal under mirroring and
//! flipping onto a single representative, rewriting every sprite placement so
//! the rendered result stays pixel-identical.

#![forbid(unsafe_code)]

/// Tiles, tile tables, sprite placements and the canonicalization engine
pub mod chr;
/// Input/output operations, command-line interface and error handling
pub mod io;

pub use io::error::{ChrError, Result};
