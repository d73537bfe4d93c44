//! Binary CHR and metasprite codecs
//!
//! A CHR file is a bare sequence of 16-byte tiles. A binary metasprite is a
//! sequence of `[x, y, tile, flags]` records closed by a single `0x80` byte.
//! Neither format has a header, so lengths are validated on read.

use crate::chr::metasprite::Metasprite;
use crate::chr::sprite::{SPRITE_BYTES, Sprite};
use crate::chr::table::{TileLayout, TileTable};
use crate::chr::tile::{TILE_BYTES, Tile};
use crate::io::configuration::METASPRITE_TERMINATOR;
use crate::io::error::{ChrError, Result, WithPath, invalid_source};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Decode a CHR stream into a table with the given layout
///
/// # Errors
///
/// Returns an error if the stream cannot be read, or its length is not a
/// whole number of units
pub fn read_chr<R: Read>(mut reader: R, layout: TileLayout) -> Result<TileTable> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_chr(&bytes, layout)
}

/// Decode CHR bytes into a table with the given layout
///
/// # Errors
///
/// Returns `InvalidSourceData` if the length is not a multiple of the unit size
pub fn decode_chr(bytes: &[u8], layout: TileLayout) -> Result<TileTable> {
    let unit_bytes = TILE_BYTES * layout.stride();
    if bytes.len() % unit_bytes != 0 {
        return Err(invalid_source(&format!(
            "CHR data is {} bytes, not a multiple of the {unit_bytes}-byte 8x{} unit",
            bytes.len(),
            layout.tile_height()
        )));
    }

    let tiles = bytes
        .chunks_exact(TILE_BYTES)
        .map(|chunk| {
            let mut tile = [0; TILE_BYTES];
            tile.copy_from_slice(chunk);
            Tile::from_bytes(&tile)
        })
        .collect();
    Ok(TileTable::with_tiles(tiles, layout))
}

/// Encode a table as CHR bytes
///
/// # Errors
///
/// Returns an error if the writer fails
pub fn write_chr<W: Write>(mut writer: W, table: &TileTable) -> Result<()> {
    for tile in table {
        writer.write_all(&tile.to_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Decode a binary metasprite
///
/// # Errors
///
/// Returns an error if the stream cannot be read or is not a whole number
/// of records followed by the `0x80` terminator
pub fn read_metasprite<R: Read>(mut reader: R) -> Result<Metasprite> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_metasprite(&bytes)
}

/// Decode binary metasprite bytes
///
/// # Errors
///
/// Returns `InvalidSourceData` if the terminator is missing or records are truncated
pub fn decode_metasprite(bytes: &[u8]) -> Result<Metasprite> {
    let Some((&terminator, records)) = bytes.split_last() else {
        return Err(invalid_source(&"metasprite is empty"));
    };
    if terminator != METASPRITE_TERMINATOR || records.len() % SPRITE_BYTES != 0 {
        return Err(invalid_source(&format!(
            "metasprite of {} bytes is not a list of {SPRITE_BYTES}-byte records closed by 0x{METASPRITE_TERMINATOR:02x}",
            bytes.len()
        )));
    }

    Ok(records
        .chunks_exact(SPRITE_BYTES)
        .map(|chunk| {
            let mut record = [0; SPRITE_BYTES];
            record.copy_from_slice(chunk);
            Sprite::from_bytes(record)
        })
        .collect())
}

/// Encode a metasprite as binary records plus terminator
///
/// # Errors
///
/// Returns an error if the writer fails
pub fn write_metasprite<W: Write>(mut writer: W, metasprite: &Metasprite) -> Result<()> {
    for sprite in metasprite {
        writer.write_all(&sprite.to_bytes())?;
    }
    writer.write_all(&[METASPRITE_TERMINATOR])?;
    writer.flush()?;
    Ok(())
}

/// Load a CHR file
///
/// # Errors
///
/// Returns an error if the file cannot be read or has an invalid length
pub fn load_chr(path: &Path, layout: TileLayout) -> Result<TileTable> {
    let bytes = fs::read(path).with_path(path, "read CHR")?;
    decode_chr(&bytes, layout).map_err(|err| with_file(err, path))
}

/// Save a table as a CHR file, replacing any existing file
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn save_chr(path: &Path, table: &TileTable) -> Result<()> {
    let file = File::create(path).with_path(path, "create CHR")?;
    write_chr(BufWriter::new(file), table).map_err(|err| with_file(err, path))
}

/// Load a binary metasprite file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed
pub fn load_metasprite(path: &Path) -> Result<Metasprite> {
    let bytes = fs::read(path).with_path(path, "read metasprite")?;
    decode_metasprite(&bytes).map_err(|err| with_file(err, path))
}

/// Save a binary metasprite file, replacing any existing file
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn save_metasprite(path: &Path, metasprite: &Metasprite) -> Result<()> {
    let file = File::create(path).with_path(path, "create metasprite")?;
    write_metasprite(BufWriter::new(file), metasprite).map_err(|err| with_file(err, path))
}

// Replaces the placeholder path on stream errors with the file being processed
fn with_file(err: ChrError, path: &Path) -> ChrError {
    match err {
        ChrError::FileSystem {
            operation, source, ..
        } => ChrError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        },
        ChrError::InvalidSourceData { reason } => ChrError::InvalidSourceData {
            reason: format!("{}: {reason}", path.display()),
        },
        other => other,
    }
}
