//! Tests for format constants and their relationships

#[cfg(test)]
mod tests {
    use chrpack::io::configuration::{
        DEFAULT_BACKGROUND_COLOR, DEFAULT_PALETTE, DEFAULT_TILE_HEIGHT, GRID_COLUMNS, GRID_ROWS,
        MAX_COLOR_INDEX, MAX_IMAGE_DIMENSION, MAX_PALETTE_COLORS, MAX_TILE_REFERENCES,
        METASPRITE_TERMINATOR, PREVIEW_SHADES,
    };

    // Tests the sprite grid covers the largest accepted image
    // Verified by shrinking the grid to 8 rows
    #[test]
    fn test_grid_covers_max_image() {
        assert_eq!(GRID_COLUMNS * 8, MAX_IMAGE_DIMENSION as usize);
        assert_eq!(GRID_ROWS * 8, MAX_IMAGE_DIMENSION as usize);
        assert_eq!(GRID_COLUMNS * GRID_ROWS, MAX_TILE_REFERENCES);
    }

    // Tests color limits describe 2-bit pixels
    // Verified by allowing 8 palette colors
    #[test]
    fn test_color_limits() {
        assert_eq!(MAX_PALETTE_COLORS, 4);
        assert_eq!(usize::from(MAX_COLOR_INDEX) + 1, MAX_PALETTE_COLORS);
        assert!(DEFAULT_BACKGROUND_COLOR <= MAX_COLOR_INDEX);
        assert!(DEFAULT_PALETTE <= MAX_COLOR_INDEX);
    }

    // Tests defaults and terminator match the hardware formats
    // Verified by defaulting to 8x16 tiles
    #[test]
    fn test_format_defaults() {
        assert_eq!(DEFAULT_TILE_HEIGHT, 8);
        assert_eq!(METASPRITE_TERMINATOR, 0x80);
    }

    // Tests palette index 0 previews as transparent and the rest are opaque
    // Verified by making index 0 opaque black
    #[test]
    fn test_preview_shades() {
        assert_eq!(PREVIEW_SHADES[0][3], 0);
        assert!(PREVIEW_SHADES[1..].iter().all(|shade| shade[3] == 255));
    }
}
