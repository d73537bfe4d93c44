//! Format constants and runtime configuration defaults

// Sprite grid covered by one converted image
/// Number of tile columns in the sprite grid
pub const GRID_COLUMNS: usize = 16;
/// Number of tile rows in the sprite grid
pub const GRID_ROWS: usize = 16;

/// Largest accepted image width or height in pixels
pub const MAX_IMAGE_DIMENSION: u32 = 128;
/// Largest accepted palette (2 bits per pixel)
pub const MAX_PALETTE_COLORS: usize = 4;
/// Highest palette index a background color or sprite palette can name
pub const MAX_COLOR_INDEX: u8 = 3;

// A sprite's tile field is a single byte
/// Number of distinct tile indices a sprite can reference
pub const MAX_TILE_REFERENCES: usize = 256;

/// Byte terminating a metasprite in every output format
pub const METASPRITE_TERMINATOR: u8 = 0x80;

// Default values for configurable parameters
/// Default unit height in pixels
pub const DEFAULT_TILE_HEIGHT: u8 = 8;
/// Default background color index
pub const DEFAULT_BACKGROUND_COLOR: u8 = 0;
/// Default sprite palette
pub const DEFAULT_PALETTE: u8 = 0;

// Output naming
/// Extension of CHR tile files
pub const CHR_EXTENSION: &str = "chr";
/// Extension of binary metasprites
pub const BIN_EXTENSION: &str = "bin";
/// Extension of C metasprite sources
pub const C_EXTENSION: &str = "c";
/// Extension of C metasprite headers
pub const HEADER_EXTENSION: &str = "h";
/// Extension of assembly metasprite includes
pub const ASM_EXTENSION: &str = "inc";
/// Extension of accepted input images
pub const PNG_EXTENSION: &str = "png";
/// Suffix added to tile sheet preview filenames
pub const PREVIEW_SUFFIX: &str = "_preview";

// Preview rendering
/// Units per row in a tile sheet preview
pub const PREVIEW_COLUMNS: usize = 16;
/// RGBA color for each palette index; index 0 is transparent
pub const PREVIEW_SHADES: [[u8; 4]; MAX_PALETTE_COLORS] = [
    [0, 0, 0, 0],
    [85, 85, 85, 255],
    [170, 170, 170, 255],
    [255, 255, 255, 255],
];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
