//! Indexed PNG decoding and tile rasterization
//!
//! Images are decoded without palette expansion so the raw 2-bit indices
//! survive, then cut into 8x8 tiles placed bottom-aligned on the 16x16
//! sprite grid. Grid cells outside the image stay blank and are pruned by
//! the cleanup pass.

use crate::chr::table::TileTable;
use crate::chr::tile::{TILE_PIXELS, Tile};
use crate::io::configuration::{
    GRID_COLUMNS, GRID_ROWS, MAX_COLOR_INDEX, MAX_IMAGE_DIMENSION, MAX_PALETTE_COLORS,
};
use crate::io::error::{ChrError, Result, WithPath, invalid_source};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Palette-indexed image with at most four colors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    pixels: Array2<u8>,
}

impl IndexedImage {
    /// Wrap a `(height, width)` grid of palette indices
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if either dimension exceeds 128 pixels or
    /// an index does not fit in 2 bits
    pub fn from_indices(pixels: Array2<u8>) -> Result<Self> {
        let (height, width) = pixels.dim();
        check_dimensions(width, height)?;

        if let Some(&index) = pixels.iter().find(|&&index| index > MAX_COLOR_INDEX) {
            return Err(invalid_source(&format!(
                "palette index {index} does not fit in 2 bits"
            )));
        }

        Ok(Self { pixels })
    }

    /// Load an indexed PNG from disk
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened
    /// - The PNG cannot be decoded
    /// - The image is not palette-indexed, its palette has more than four
    ///   entries, or it is larger than 128x128
    pub fn from_png_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_path(path, "open image")?;
        Self::from_png_reader(BufReader::new(file)).map_err(|err| match err {
            ChrError::ImageLoad { source, .. } => ChrError::ImageLoad {
                path: path.to_path_buf(),
                source,
            },
            ChrError::InvalidSourceData { reason } => ChrError::InvalidSourceData {
                reason: format!("{}: {reason}", path.display()),
            },
            other => other,
        })
    }

    /// Decode an indexed PNG stream
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::from_png_file`], minus opening the file
    pub fn from_png_reader<R: Read>(source: R) -> Result<Self> {
        let mut decoder = png::Decoder::new(source);
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().map_err(decoding_error)?;

        let (color_type, palette_len) = {
            let info = reader.info();
            let palette_len = info.palette.as_ref().map_or(0, |palette| palette.len() / 3);
            (info.color_type, palette_len)
        };

        if color_type != png::ColorType::Indexed {
            return Err(invalid_source(&format!(
                "image must be palette-indexed, found {color_type:?}"
            )));
        }
        if palette_len > MAX_PALETTE_COLORS {
            return Err(invalid_source(&format!(
                "palette has {palette_len} colors, at most {MAX_PALETTE_COLORS} are supported"
            )));
        }

        let mut buffer = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buffer).map_err(decoding_error)?;
        check_dimensions(frame.width as usize, frame.height as usize)?;

        let depth = frame.bit_depth as usize;
        if !matches!(depth, 1 | 2 | 4 | 8) {
            return Err(invalid_source(&format!(
                "unsupported indexed bit depth {depth}"
            )));
        }

        let mut pixels = Array2::zeros((frame.height as usize, frame.width as usize));
        for ((row, col), pixel) in pixels.indexed_iter_mut() {
            *pixel = unpack_index(&buffer, row * frame.line_size, col, depth);
        }

        Self::from_indices(pixels)
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// The `(height, width)` index grid
    pub const fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    /// Cut the image into a full 16x16 grid of 8x8 tiles
    ///
    /// The image is left-aligned and bottom-aligned on the grid. When
    /// `background` is not 0, indices `background` and 0 trade places so the
    /// background renders transparent. Padding outside the image is blank.
    pub fn rasterize(&self, background: u8) -> TileTable {
        let mut table = TileTable::blank_grid();
        let rows = self.height().div_ceil(TILE_PIXELS);
        let cols = self.width().div_ceil(TILE_PIXELS);
        let first_row = GRID_ROWS.saturating_sub(rows);

        for tile_row in 0..rows {
            for tile_col in 0..cols {
                let mut indices = [[0; TILE_PIXELS]; TILE_PIXELS];
                for (y, line) in indices.iter_mut().enumerate() {
                    for (x, pixel) in line.iter_mut().enumerate() {
                        let position = (tile_row * TILE_PIXELS + y, tile_col * TILE_PIXELS + x);
                        *pixel = self
                            .pixels
                            .get(position)
                            .map_or(0, |&index| swap_background(index, background));
                    }
                }

                let grid_index = (first_row + tile_row) * GRID_COLUMNS + tile_col;
                if let Some(tile) = table.get_mut(grid_index) {
                    *tile = Tile::from_indices(&indices);
                }
            }
        }

        table
    }
}

/// Exchange palette index 0 with the configured background index
pub const fn swap_background(index: u8, background: u8) -> u8 {
    if background == 0 {
        index
    } else if index == background {
        0
    } else if index == 0 {
        background
    } else {
        index
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    let limit = MAX_IMAGE_DIMENSION as usize;
    if width > limit || height > limit {
        return Err(invalid_source(&format!(
            "image is {width}x{height}, the maximum is {limit}x{limit} pixels"
        )));
    }
    Ok(())
}

// Reads pixel `x` from a packed scanline starting at `line_start`
fn unpack_index(buffer: &[u8], line_start: usize, x: usize, depth: usize) -> u8 {
    let bit = x * depth;
    let byte = buffer.get(line_start + bit / 8).copied().unwrap_or(0);
    let shift = 8 - depth - bit % 8;
    let mask = ((1_u16 << depth) - 1) as u8;
    (byte >> shift) & mask
}

fn decoding_error(source: png::DecodingError) -> ChrError {
    ChrError::ImageLoad {
        path: PathBuf::from("<stream>"),
        source,
    }
}
