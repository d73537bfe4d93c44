//! Priority-ordered geometric matching between tiles
//!
//! Matching is kept separate from removal so the transform rules can be
//! checked in isolation. Candidates are tried in a fixed order and the first
//! relation that holds wins.

use crate::chr::sprite::SpriteFlags;
use crate::chr::tile::Tile;

/// Geometric relation found between a redundant tile and its representative
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileMatch {
    /// Byte-for-byte identical
    Exact,
    /// Horizontal mirror image
    Mirrored,
    /// Vertical flip
    Flipped,
    /// Horizontal mirror of the vertical flip
    MirrorFlipped,
}

impl TileMatch {
    /// All relations in priority order
    pub const PRIORITY: [Self; 4] = [Self::Exact, Self::Mirrored, Self::Flipped, Self::MirrorFlipped];

    /// Sprite attribute bits that render the representative as the original
    pub const fn flags(self) -> SpriteFlags {
        match self {
            Self::Exact => SpriteFlags::empty(),
            Self::Mirrored => SpriteFlags::MIRROR,
            Self::Flipped => SpriteFlags::FLIP,
            Self::MirrorFlipped => SpriteFlags::MIRROR.union(SpriteFlags::FLIP),
        }
    }

    /// True when `candidate` is `representative` under this relation
    pub fn holds(self, candidate: &Tile, representative: &Tile) -> bool {
        match self {
            Self::Exact => candidate == representative,
            Self::Mirrored => candidate.is_mirror_of(representative),
            Self::Flipped => candidate.is_flip_of(representative),
            Self::MirrorFlipped => candidate.is_mirror_flip_of(representative),
        }
    }

    /// True when the 8x16 unit `candidate` is `representative` under this relation
    ///
    /// Both halves must satisfy the same relation. Flipping a composite unit
    /// swaps its halves, so flip relations compare top against bottom.
    pub fn holds_for_pair(self, candidate: [&Tile; 2], representative: [&Tile; 2]) -> bool {
        let [top, bottom] = candidate;
        let [rep_top, rep_bottom] = representative;
        match self {
            Self::Exact | Self::Mirrored => {
                self.holds(top, rep_top) && self.holds(bottom, rep_bottom)
            }
            Self::Flipped | Self::MirrorFlipped => {
                self.holds(top, rep_bottom) && self.holds(bottom, rep_top)
            }
        }
    }
}

/// Which geometric relations count as redundancy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatchOptions {
    /// Fold tiles that are horizontal mirrors of an earlier tile
    pub mirror: bool,
    /// Fold tiles that are vertical flips of an earlier tile
    pub flip: bool,
}

impl MatchOptions {
    /// Exact matches only
    pub const EXACT: Self = Self {
        mirror: false,
        flip: false,
    };

    /// Every relation enabled
    pub const ALL: Self = Self {
        mirror: true,
        flip: true,
    };

    /// Create options from the two render-time capabilities
    pub const fn new(mirror: bool, flip: bool) -> Self {
        Self { mirror, flip }
    }

    /// Whether `relation` may be used under these options
    ///
    /// Mirror-flip needs both attribute bits at render time, so it is only
    /// available when both simpler relations are.
    pub const fn allows(self, relation: TileMatch) -> bool {
        match relation {
            TileMatch::Exact => true,
            TileMatch::Mirrored => self.mirror,
            TileMatch::Flipped => self.flip,
            TileMatch::MirrorFlipped => self.mirror && self.flip,
        }
    }

    /// Enabled relations in priority order
    pub fn relations(self) -> impl Iterator<Item = TileMatch> {
        TileMatch::PRIORITY
            .into_iter()
            .filter(move |&relation| self.allows(relation))
    }

    /// First enabled relation under which `candidate` equals `representative`
    pub fn match_tiles(self, candidate: &Tile, representative: &Tile) -> Option<TileMatch> {
        self.relations()
            .find(|relation| relation.holds(candidate, representative))
    }

    /// First enabled relation under which two 8x16 units match
    pub fn match_pairs(
        self,
        candidate: [&Tile; 2],
        representative: [&Tile; 2],
    ) -> Option<TileMatch> {
        self.relations()
            .find(|relation| relation.holds_for_pair(candidate, representative))
    }
}
