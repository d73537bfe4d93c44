//! Command-line interface for converting images and combining CHR banks

use crate::chr::cleanup::{TileBank, canonicalize};
use crate::chr::matching::MatchOptions;
use crate::chr::metasprite::Metasprite;
use crate::chr::table::TileLayout;
use crate::io::codec::{load_chr, load_metasprite, save_chr, save_metasprite};
use crate::io::configuration::{
    BIN_EXTENSION, CHR_EXTENSION, DEFAULT_BACKGROUND_COLOR, DEFAULT_PALETTE, DEFAULT_TILE_HEIGHT,
    MAX_COLOR_INDEX, PNG_EXTENSION, PREVIEW_SUFFIX,
};
use crate::io::error::{Result, WithPath, invalid_parameter};
use crate::io::export::{MetaspriteFormat, export_metasprite};
use crate::io::image::export_tiles_as_png;
use crate::io::progress::{FileStage, ProgressManager};
use crate::io::raster::IndexedImage;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(name = "chrpack")]
#[command(
    author,
    version,
    about = "Convert indexed PNG images into NES CHR tiles and metasprites"
)]
/// Command-line arguments for the CHR conversion tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Available operations
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Convert PNG images into CHR + metasprite files
    ///
    /// Each image is cut into tiles of the chosen height, then blank and
    /// duplicated tiles are removed. The metasprite places (0,0) at the
    /// bottom-left corner of the image. Images must be indexed with at most
    /// 4 colors and at most 128x128 pixels.
    #[command(name = "img2spr")]
    Img2Spr(ConvertArgs),

    /// Concatenate CHR files into one, removing tiles duplicated across them
    ///
    /// A metasprite stored next to an input (same name, `.bin` extension) is
    /// rebased onto the combined CHR and rewritten in place.
    #[command(name = "concat")]
    Concat(ConcatArgs),

    /// Merge binary metasprite files into one
    ///
    /// All files are appended to the first one.
    #[command(name = "mergemeta")]
    MergeMeta(MergeArgs),
}

/// Tile layout and redundancy options shared by converting commands
#[derive(Args, Clone, Copy, Debug)]
pub struct TileArgs {
    /// Height of the tiles: 8 for 8x8, 16 for 8x16
    #[arg(short = 't', long, default_value_t = DEFAULT_TILE_HEIGHT, value_parser = parse_tile_height)]
    pub tile_height: u8,

    /// Also remove tiles that are horizontal mirrors of another tile
    #[arg(short = 'm', long)]
    pub mirror: bool,

    /// Also remove tiles that are vertical flips of another tile
    #[arg(short = 'F', long)]
    pub flip: bool,
}

impl TileArgs {
    /// Unit layout selected by the tile height
    pub fn layout(&self) -> TileLayout {
        TileLayout::from_tile_height(self.tile_height).unwrap_or_default()
    }

    /// Redundancy relations enabled by the flags
    pub const fn match_options(&self) -> MatchOptions {
        MatchOptions::new(self.mirror, self.flip)
    }
}

/// Arguments of `img2spr`
#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// Input PNG files or directories to process
    #[arg(value_name = "IMAGE", required = true)]
    pub targets: Vec<PathBuf>,

    /// Sprite palette stored in every sprite [0,3]
    #[arg(short, long, default_value_t = DEFAULT_PALETTE, value_parser = color_index_parser())]
    pub pal: u8,

    /// Color index of the background [0,3]
    #[arg(short, long, default_value_t = DEFAULT_BACKGROUND_COLOR, value_parser = color_index_parser())]
    pub bg_color: u8,

    /// Tile layout and redundancy options
    #[command(flatten)]
    pub tiles: TileArgs,

    /// Value to add to every sprite's X coordinate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub dx: i8,

    /// Value to add to every sprite's Y coordinate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub dy: i8,

    /// Metasprite output format
    #[arg(short = 'f', long, value_enum, default_value_t = MetaspriteFormat::Bin)]
    pub metasprite_format: MetaspriteFormat,

    /// Also write a PNG preview of the remaining tiles (<image>_preview.png)
    #[arg(long)]
    pub preview: bool,
}

/// Arguments of `concat`
#[derive(Args, Clone, Debug)]
pub struct ConcatArgs {
    /// CHR files to concatenate, in order
    #[arg(value_name = "CHR", num_args = 2.., required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output CHR file name
    #[arg(short = 'o', long)]
    pub chr_output: PathBuf,

    /// Tile layout and redundancy options
    #[command(flatten)]
    pub tiles: TileArgs,
}

/// Arguments of `mergemeta`
#[derive(Args, Clone, Debug)]
pub struct MergeArgs {
    /// Binary metasprite files to merge, in order
    #[arg(value_name = "METASPRITE", num_args = 2.., required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output metasprite file name (defaults to the first input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_tile_height(value: &str) -> std::result::Result<u8, String> {
    value
        .parse::<u8>()
        .ok()
        .filter(|&height| TileLayout::from_tile_height(height).is_some())
        .ok_or_else(|| format!("invalid tile height '{value}', expected 8 or 16"))
}

fn color_index_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(0..=i64::from(MAX_COLOR_INDEX))
}

/// Runs the parsed command with progress tracking
pub struct CommandRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CommandRunner {
    /// Create a new runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if input validation, conversion or any file
    /// operation fails. Outputs written before the failure are kept.
    pub fn process(&mut self) -> Result<()> {
        match self.cli.command.clone() {
            Command::Img2Spr(args) => self.convert(&args),
            Command::Concat(args) => self.concat(&args),
            Command::MergeMeta(args) => Self::merge(&args),
        }
    }

    fn convert(&mut self, args: &ConvertArgs) -> Result<()> {
        let files = collect_images(&args.targets)?;

        if files.is_empty() {
            warn!("No PNG images found to convert");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.convert_file(file, index, args)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn convert_file(&mut self, input_path: &Path, index: usize, args: &ConvertArgs) -> Result<()> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }
        self.report_stage(index, FileStage::Load);

        let image = IndexedImage::from_png_file(input_path)?;
        let mut table = image.rasterize(args.bg_color);
        let mut metasprite = Metasprite::from_grid(&table, (args.dx, args.dy), args.pal);

        if args.tiles.layout() == TileLayout::Paired {
            table.to_paired();
            metasprite.to_paired();
        }

        self.report_stage(index, FileStage::Cleanup);
        let report = canonicalize(&mut table, &mut metasprite, args.tiles.match_options());
        info!(
            "{}: {} tiles and {} sprites after removing {} blank and {} duplicate units",
            input_path.display(),
            report.remaining_tiles,
            metasprite.len(),
            report.blank_units,
            report.duplicate_units
        );

        self.report_stage(index, FileStage::Write);
        let chr_path = input_path.with_extension(CHR_EXTENSION);
        save_chr(&chr_path, &table)?;
        info!("wrote {}", chr_path.display());

        for written in export_metasprite(input_path, args.metasprite_format, &metasprite)? {
            info!("wrote {}", written.display());
        }

        if args.preview {
            if table.is_empty() {
                warn!(
                    "{}: no tiles left, skipping preview",
                    input_path.display()
                );
            } else {
                let preview = preview_path(input_path);
                export_tiles_as_png(&table, &preview)?;
                info!("wrote {}", preview.display());
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        Ok(())
    }

    fn concat(&mut self, args: &ConcatArgs) -> Result<()> {
        let layout = args.tiles.layout();
        let mut bank = TileBank::new(layout, args.tiles.match_options());
        let mut sidecars = Vec::with_capacity(args.inputs.len());

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(args.inputs.len());
        }

        for (index, input) in args.inputs.iter().enumerate() {
            if let Some(ref mut pm) = self.progress_manager {
                pm.start_file(index, input);
            }
            self.report_stage(index, FileStage::Load);

            let tiles = load_chr(input, layout)?;
            let sidecar = input.with_extension(BIN_EXTENSION);
            let metasprite = if sidecar.is_file() {
                let metasprite = load_metasprite(&sidecar)?;
                sidecars.push(Some(sidecar));
                metasprite
            } else {
                sidecars.push(None);
                Metasprite::new()
            };

            self.report_stage(index, FileStage::Cleanup);
            let folded = bank.concatenate(tiles, metasprite)?;
            info!(
                "{}: folded {folded} units, combined CHR holds {} tiles",
                input.display(),
                bank.table().len()
            );

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_file(index);
            }
        }

        let (table, metasprites) = bank.into_parts();
        save_chr(&args.chr_output, &table)?;
        info!("wrote {}", args.chr_output.display());

        for (sidecar, metasprite) in sidecars.iter().zip(&metasprites) {
            if let Some(path) = sidecar {
                save_metasprite(path, metasprite)?;
                info!("rewrote {}", path.display());
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn merge(args: &MergeArgs) -> Result<()> {
        let Some(first) = args.inputs.first() else {
            warn!("No metasprite files given to merge");
            return Ok(());
        };

        let mut merged = Metasprite::new();
        for input in &args.inputs {
            let mut metasprite = load_metasprite(input)?;
            merged.append(&mut metasprite);
        }

        let output = args.output.as_deref().unwrap_or(first.as_path());
        save_metasprite(output, &merged)?;
        info!(
            "merged {} metasprites into {} ({} sprites)",
            args.inputs.len(),
            output.display(),
            merged.len()
        );

        Ok(())
    }

    fn report_stage(&mut self, index: usize, stage: FileStage) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.update_stage(index, stage);
        }
    }
}

/// Path of the tile sheet preview written for `input_path`
pub fn preview_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let preview_name = format!(
        "{}{PREVIEW_SUFFIX}.{PNG_EXTENSION}",
        stem.to_string_lossy()
    );

    if let Some(parent) = input_path.parent() {
        parent.join(preview_name)
    } else {
        PathBuf::from(preview_name)
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PNG_EXTENSION))
}

fn is_preview(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(PREVIEW_SUFFIX))
}

/// Expand targets into the PNG files to convert
///
/// Files are taken as given; directories contribute their PNG files in
/// name order, skipping previews written by earlier runs.
///
/// # Errors
///
/// Returns an error if a target is neither a PNG file nor a readable directory
pub fn collect_images(targets: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for target in targets {
        if target.is_file() {
            if is_png(target) {
                files.push(target.clone());
            } else {
                return Err(invalid_parameter(
                    "IMAGE",
                    &target.display(),
                    &"Target file must be a PNG image",
                ));
            }
        } else if target.is_dir() {
            let mut found = Vec::new();
            for entry in std::fs::read_dir(target).with_path(target, "read directory")? {
                let path = entry.with_path(target, "read directory")?.path();
                if is_png(&path) && !is_preview(&path) {
                    found.push(path);
                }
            }
            found.sort();
            files.extend(found);
        } else {
            return Err(invalid_parameter(
                "IMAGE",
                &target.display(),
                &"Target must be a PNG file or directory",
            ));
        }
    }

    Ok(files)
}
