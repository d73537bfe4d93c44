//! PNG preview of a tile table with transparent background

use crate::chr::table::TileTable;
use crate::chr::tile::TILE_PIXELS;
use crate::io::configuration::{PREVIEW_COLUMNS, PREVIEW_SHADES};
use crate::io::error::{ChrError, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

/// Render every unit of `table` into a tile sheet
///
/// Units are laid out left to right, 16 per row; 8x16 units keep their two
/// halves stacked. Palette index 0 is transparent and 1 to 3 are increasingly
/// light grays.
pub fn render_tile_sheet(table: &TileTable) -> RgbaImage {
    let stride = table.layout().stride();
    let units = table.len().div_ceil(stride);
    let columns = units.min(PREVIEW_COLUMNS);
    let rows = units.div_ceil(PREVIEW_COLUMNS);
    let unit_height = TILE_PIXELS * stride;

    let mut img = ImageBuffer::new(
        (columns * TILE_PIXELS) as u32,
        (rows * unit_height) as u32,
    );

    for (index, tile) in table.iter().enumerate() {
        let unit = index / stride;
        let origin_x = (unit % PREVIEW_COLUMNS) * TILE_PIXELS;
        let origin_y = (unit / PREVIEW_COLUMNS) * unit_height + (index % stride) * TILE_PIXELS;

        for y in 0..TILE_PIXELS {
            for x in 0..TILE_PIXELS {
                let shade = PREVIEW_SHADES
                    .get(usize::from(tile.pixel(x, y)))
                    .copied()
                    .unwrap_or([0, 0, 0, 0]);
                img.put_pixel((origin_x + x) as u32, (origin_y + y) as u32, Rgba(shade));
            }
        }
    }

    img
}

/// Export a tile table preview as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The table holds no tiles
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_tiles_as_png(table: &TileTable, output_path: &Path) -> Result<()> {
    if table.is_empty() {
        return Err(ChrError::InvalidSourceData {
            reason: "No tiles left to preview".to_string(),
        });
    }

    let img = render_tile_sheet(table);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ChrError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| ChrError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
