//! Metasprite exporters
//!
//! Every format lists the sprites as `x, y, tile, flags` in render order and
//! closes the list with the `0x80` terminator byte.

use crate::chr::metasprite::Metasprite;
use crate::chr::sprite::SPRITE_BYTES;
use crate::io::codec::save_metasprite;
use crate::io::configuration::{
    ASM_EXTENSION, BIN_EXTENSION, C_EXTENSION, HEADER_EXTENSION, METASPRITE_TERMINATOR,
};
use crate::io::error::{ChrError, Result, WithPath};
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output format for metasprites
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum MetaspriteFormat {
    /// C source array plus header declaration
    C,
    /// Assembly include of `.byte` directives
    Asm,
    /// Raw binary records
    #[default]
    Bin,
}

/// Identifier used for the metasprite symbol in text formats
///
/// The file stem with every character that is not ASCII alphanumeric
/// replaced by `_`, prefixed with `_` if it would start with a digit.
pub fn symbol_name(path: &Path) -> String {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Write the C header declaring the metasprite array
///
/// # Errors
///
/// Returns an error if the writer fails
pub fn write_c_header<W: Write>(mut writer: W, name: &str, metasprite: &Metasprite) -> Result<()> {
    writeln!(
        writer,
        "extern const char {name}[{}];",
        encoded_len(metasprite)
    )?;
    writer.flush()?;
    Ok(())
}

/// Write the C source defining the metasprite array
///
/// # Errors
///
/// Returns an error if the writer fails
pub fn write_c_source<W: Write>(mut writer: W, name: &str, metasprite: &Metasprite) -> Result<()> {
    writeln!(writer, "const char {name}[] = {{")?;
    for sprite in metasprite {
        writeln!(writer, "\t{sprite},")?;
    }
    writeln!(writer, "\t0x{METASPRITE_TERMINATOR:x},")?;
    writeln!(writer, "}};")?;
    writer.flush()?;
    Ok(())
}

/// Write the assembly include for the metasprite
///
/// # Errors
///
/// Returns an error if the writer fails
pub fn write_asm<W: Write>(mut writer: W, name: &str, metasprite: &Metasprite) -> Result<()> {
    writeln!(writer, "{name}:")?;
    for sprite in metasprite {
        writeln!(writer, "\t.byte {sprite}")?;
    }
    writeln!(writer, "\t.byte ${METASPRITE_TERMINATOR:x}")?;
    writer.flush()?;
    Ok(())
}

/// Write `metasprite` next to `source` in the requested format
///
/// The output files share `source`'s stem: `.bin`, `.inc`, or `.c` plus `.h`.
/// Returns the paths written.
///
/// # Errors
///
/// Returns an error if an output file cannot be created or written
pub fn export_metasprite(
    source: &Path,
    format: MetaspriteFormat,
    metasprite: &Metasprite,
) -> Result<Vec<PathBuf>> {
    let name = symbol_name(source);
    match format {
        MetaspriteFormat::Bin => {
            let path = source.with_extension(BIN_EXTENSION);
            save_metasprite(&path, metasprite)?;
            Ok(vec![path])
        }
        MetaspriteFormat::Asm => {
            let path = source.with_extension(ASM_EXTENSION);
            write_asm(create(&path)?, &name, metasprite).map_err(|err| relocate(err, &path))?;
            Ok(vec![path])
        }
        MetaspriteFormat::C => {
            let source_path = source.with_extension(C_EXTENSION);
            let header_path = source.with_extension(HEADER_EXTENSION);
            write_c_source(create(&source_path)?, &name, metasprite)
                .map_err(|err| relocate(err, &source_path))?;
            write_c_header(create(&header_path)?, &name, metasprite)
                .map_err(|err| relocate(err, &header_path))?;
            Ok(vec![source_path, header_path])
        }
    }
}

// Array length including the terminator
const fn encoded_len(metasprite: &Metasprite) -> usize {
    metasprite.len() * SPRITE_BYTES + 1
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .with_path(path, "create metasprite")
        .map(BufWriter::new)
}

fn relocate(err: ChrError, path: &Path) -> ChrError {
    match err {
        ChrError::FileSystem { source, .. } => ChrError::FileSystem {
            path: path.to_path_buf(),
            operation: "write metasprite",
            source,
        },
        other => other,
    }
}
