//! Input/output: image decoding, CHR and metasprite codecs, exporters and CLI

/// Command-line interface and command execution
pub mod cli;
/// Binary CHR and metasprite readers and writers
pub mod codec;
/// Format constants and runtime defaults
pub mod configuration;
/// Error types and path context helpers
pub mod error;
/// Metasprite exporters for C, assembly and binary output
pub mod export;
/// PNG preview rendering of tile tables
pub mod image;
/// Batch progress display
pub mod progress;
/// Indexed PNG decoding and tile rasterization
pub mod raster;
