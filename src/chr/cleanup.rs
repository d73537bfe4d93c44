//! Blank and duplicate tile removal
//!
//! Both passes walk the table from the highest unit down. Removing unit `i`
//! only shifts units above `i`, and those have already been visited, so the
//! indices still to be examined stay valid for the whole pass. The inner
//! duplicate search runs upward from 0, which makes the earliest occurrence
//! of every equivalence class its surviving representative.

use crate::chr::matching::{MatchOptions, TileMatch};
use crate::chr::metasprite::{Metasprite, Remap};
use crate::chr::table::{TileLayout, TileTable};
use crate::chr::tile::Tile;
use crate::io::error::{ChrError, Result};
use log::debug;

/// Units removed by a cleanup run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Blank units removed
    pub blank_units: usize,
    /// Units folded onto an earlier equivalent
    pub duplicate_units: usize,
    /// Tiles left in the table
    pub remaining_tiles: usize,
}

/// Remove blank and redundant units from `table`, rewriting `metasprite`
///
/// The table's layout decides whether units are single tiles or 8x16 pairs.
pub fn canonicalize(
    table: &mut TileTable,
    metasprite: &mut Metasprite,
    options: MatchOptions,
) -> CleanupReport {
    let blank_units = remove_blank_tiles(table, metasprite);
    let duplicate_units = remove_duplicate_tiles(table, &mut [metasprite], options);

    debug!(
        "cleanup removed {blank_units} blank and {duplicate_units} duplicate units, {} tiles left",
        table.len()
    );

    CleanupReport {
        blank_units,
        duplicate_units,
        remaining_tiles: table.len(),
    }
}

/// Remove every blank unit and the sprites placed on it
///
/// An 8x16 unit is blank only when both halves are. Returns the number of
/// units removed.
pub fn remove_blank_tiles(table: &mut TileTable, metasprite: &mut Metasprite) -> usize {
    let stride = table.layout().stride();
    let mut removed = 0;

    for unit in (0..table.len() / stride).rev() {
        let index = unit * stride;
        let blank = (index..index + stride).all(|i| table.get(i).is_some_and(Tile::is_empty));
        if blank {
            remove_unit(table, index, stride);
            metasprite.remap_after_removal(index, stride, Remap::Drop);
            removed += 1;
        }
    }

    removed
}

/// Fold every unit equivalent to an earlier one onto that earlier unit
///
/// Every metasprite in `metasprites` is rewritten, so lists sharing the table
/// stay consistent. Returns the number of units removed.
pub fn remove_duplicate_tiles(
    table: &mut TileTable,
    metasprites: &mut [&mut Metasprite],
    options: MatchOptions,
) -> usize {
    let layout = table.layout();
    let stride = layout.stride();
    let mut removed = 0;

    for unit in (0..table.len() / stride).rev() {
        let index = unit * stride;
        let found = (0..unit).find_map(|other| {
            let representative = other * stride;
            match_units(table, index, representative, options)
                .map(|relation| (representative, relation))
        });

        if let Some((representative, relation)) = found {
            remove_unit(table, index, stride);
            let remap = Remap::Redirect {
                index: representative,
                flags: relation.flags(),
            };
            for metasprite in metasprites.iter_mut() {
                metasprite.remap_after_removal(index, stride, remap);
            }
            removed += 1;
        }
    }

    removed
}

// Relation under which the unit at `candidate` reproduces the unit at `representative`
fn match_units(
    table: &TileTable,
    candidate: usize,
    representative: usize,
    options: MatchOptions,
) -> Option<TileMatch> {
    match table.layout() {
        TileLayout::Single => {
            options.match_tiles(table.get(candidate)?, table.get(representative)?)
        }
        TileLayout::Paired => options.match_pairs(
            [table.get(candidate)?, table.get(candidate + 1)?],
            [table.get(representative)?, table.get(representative + 1)?],
        ),
    }
}

fn remove_unit(table: &mut TileTable, index: usize, stride: usize) {
    for offset in (0..stride).rev() {
        table.remove_at(index + offset);
    }
}

/// Accumulates several CHR banks into one deduplicated table
///
/// Each concatenated bank's metasprite is rebased onto the accumulated
/// table and kept alongside it, so later deduplication keeps every earlier
/// metasprite consistent too. Blank tiles are expected to be gone already.
#[derive(Clone, Debug, Default)]
pub struct TileBank {
    table: TileTable,
    metasprites: Vec<Metasprite>,
    options: MatchOptions,
}

impl TileBank {
    /// Create an empty bank
    pub const fn new(layout: TileLayout, options: MatchOptions) -> Self {
        Self {
            table: TileTable::new(layout),
            metasprites: Vec::new(),
            options,
        }
    }

    /// Accumulated tile table
    pub const fn table(&self) -> &TileTable {
        &self.table
    }

    /// Rebased metasprites, in concatenation order
    pub fn metasprites(&self) -> &[Metasprite] {
        &self.metasprites
    }

    /// Append `tiles` and fold its units onto existing equivalents
    ///
    /// `metasprite` indexes `tiles`; it is rebased onto the bank before the
    /// duplicate pass. Returns the number of units folded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `tiles` uses a different layout than the bank
    /// - `metasprite` references a unit outside `tiles`
    /// - a rebased index no longer fits in a sprite's tile field
    ///
    /// Rebasing happens before deduplication, so the last case applies even
    /// when every unit of `tiles` would fold into the bank.
    pub fn concatenate(&mut self, mut tiles: TileTable, mut metasprite: Metasprite) -> Result<usize> {
        if tiles.layout() != self.table.layout() {
            return Err(ChrError::InvalidSourceData {
                reason: format!(
                    "cannot concatenate 8x{} tiles onto an 8x{} bank",
                    tiles.layout().tile_height(),
                    self.table.layout().tile_height()
                ),
            });
        }

        metasprite.validate(&tiles)?;
        metasprite.bias(self.table.len())?;
        self.table.append(&mut tiles);
        self.metasprites.push(metasprite);

        let mut resident: Vec<&mut Metasprite> = self.metasprites.iter_mut().collect();
        let removed = remove_duplicate_tiles(&mut self.table, &mut resident, self.options);

        debug!(
            "concatenation folded {removed} units, bank holds {} tiles",
            self.table.len()
        );
        Ok(removed)
    }

    /// Consume the bank, returning the table and the rebased metasprites
    pub fn into_parts(self) -> (TileTable, Vec<Metasprite>) {
        (self.table, self.metasprites)
    }
}
