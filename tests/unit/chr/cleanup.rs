//! Tests for blank removal, duplicate folding and bank concatenation

#[cfg(test)]
mod tests {
    use chrpack::ChrError;
    use chrpack::chr::cleanup::{
        TileBank, canonicalize, remove_blank_tiles, remove_duplicate_tiles,
    };
    use chrpack::chr::matching::MatchOptions;
    use chrpack::chr::metasprite::Metasprite;
    use chrpack::chr::sprite::{Sprite, SpriteFlags};
    use chrpack::chr::table::{TileLayout, TileTable};
    use chrpack::chr::tile::{TILE_BYTES, TILE_PIXELS, Tile};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn dot(x: usize, y: usize, color: u8) -> Tile {
        let mut pixels = [[0; TILE_PIXELS]; TILE_PIXELS];
        if let Some(pixel) = pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *pixel = color;
        }
        Tile::from_indices(&pixels)
    }

    fn on(tile: u8) -> Sprite {
        Sprite::new(0, 0, tile, SpriteFlags::empty())
    }

    fn single(tiles: Vec<Tile>) -> TileTable {
        TileTable::with_tiles(tiles, TileLayout::Single)
    }

    // Pixel seen through a sprite's transform bits
    fn rendered(table: &TileTable, sprite: &Sprite, x: usize, y: usize) -> u8 {
        let x = if sprite.flags.contains(SpriteFlags::MIRROR) { TILE_PIXELS - 1 - x } else { x };
        let y = if sprite.flags.contains(SpriteFlags::FLIP) { TILE_PIXELS - 1 - y } else { y };
        table.get(sprite.position()).map_or(0, |tile| tile.pixel(x, y))
    }

    // Pixel of an 8x16 sprite; a vertical flip also swaps the two halves
    fn rendered_tall(table: &TileTable, sprite: &Sprite, x: usize, y: usize) -> u8 {
        let height = 2 * TILE_PIXELS;
        let x = if sprite.flags.contains(SpriteFlags::MIRROR) { TILE_PIXELS - 1 - x } else { x };
        let y = if sprite.flags.contains(SpriteFlags::FLIP) { height - 1 - y } else { y };
        table
            .get(sprite.position() + y / TILE_PIXELS)
            .map_or(0, |tile| tile.pixel(x, y % TILE_PIXELS))
    }

    fn tiles_of(metasprite: &Metasprite) -> Vec<u8> {
        metasprite.iter().map(|s| s.tile).collect()
    }

    // Tests blank tiles disappear with their sprites and later indices shift
    // Verified by not shifting indices above the removed tile
    #[test]
    fn test_remove_blank_tiles() {
        let a = dot(0, 0, 1);
        let b = dot(1, 1, 2);
        let mut table = single(vec![Tile::default(), a, Tile::default(), b]);
        let mut metasprite = Metasprite::with_sprites(vec![on(0), on(1), on(2), on(3)]);

        let removed = remove_blank_tiles(&mut table, &mut metasprite);

        assert_eq!(removed, 2);
        assert_eq!(table.tiles(), &[a, b]);
        assert_eq!(tiles_of(&metasprite), vec![0, 1]);
    }

    // Tests an 8x16 unit is kept when only one half is blank
    // Verified by testing only the top half for blankness
    #[test]
    fn test_remove_blank_pairs() {
        let a = dot(2, 2, 3);
        let mut table = TileTable::with_tiles(
            vec![Tile::default(), Tile::default(), Tile::default(), a],
            TileLayout::Paired,
        );
        let mut metasprite = Metasprite::with_sprites(vec![on(0), on(2)]);

        let removed = remove_blank_tiles(&mut table, &mut metasprite);

        assert_eq!(removed, 1);
        assert_eq!(table.tiles(), &[Tile::default(), a]);
        assert_eq!(metasprite.sprites(), &[on(0)]);
    }

    // Tests sprites above a removed 8x16 unit move down by two in both passes
    // Verified by shifting indices by one regardless of layout
    #[test]
    fn test_paired_removal_shifts_by_two() {
        let (a, b, c, d) = (dot(0, 1, 1), dot(2, 3, 1), dot(4, 5, 2), dot(6, 7, 2));
        let mut table = TileTable::with_tiles(
            vec![a, b, Tile::default(), Tile::default(), a, b, c, d],
            TileLayout::Paired,
        );
        let mut metasprite = Metasprite::with_sprites(vec![on(0), on(2), on(4), on(6)]);

        let blanks = remove_blank_tiles(&mut table, &mut metasprite);
        assert_eq!(blanks, 1);
        assert_eq!(table.tiles(), &[a, b, a, b, c, d]);
        assert_eq!(tiles_of(&metasprite), vec![0, 2, 4]);

        let duplicates =
            remove_duplicate_tiles(&mut table, &mut [&mut metasprite], MatchOptions::EXACT);
        assert_eq!(duplicates, 1);
        assert_eq!(table.tiles(), &[a, b, c, d]);
        assert_eq!(tiles_of(&metasprite), vec![0, 0, 2]);
    }

    // Tests 8x16 units fold under every relation with the matching transform bits
    // Verified by comparing flipped units half against same half
    #[test]
    fn test_paired_relations_fold() {
        let (a, b) = (dot(1, 2, 1), dot(5, 6, 2));
        let (c, d) = (dot(0, 0, 3), dot(7, 7, 3));
        let mut table = TileTable::with_tiles(
            vec![
                a,
                b,
                c,
                d,
                a.mirrored(),
                b.mirrored(),
                b.flipped(),
                a.flipped(),
                b.mirrored().flipped(),
                a.mirrored().flipped(),
            ],
            TileLayout::Paired,
        );
        let mut metasprite = Metasprite::with_sprites(vec![
            on(0),
            on(2),
            on(4),
            on(6),
            Sprite::new(0, 0, 8, SpriteFlags::FLIP),
        ]);

        let removed =
            remove_duplicate_tiles(&mut table, &mut [&mut metasprite], MatchOptions::ALL);

        assert_eq!(removed, 3);
        assert_eq!(table.tiles(), &[a, b, c, d]);
        assert_eq!(
            metasprite.sprites(),
            &[
                on(0),
                on(2),
                Sprite::new(0, 0, 0, SpriteFlags::MIRROR),
                Sprite::new(0, 0, 0, SpriteFlags::FLIP),
                Sprite::new(0, 0, 0, SpriteFlags::MIRROR),
            ]
        );
    }

    // Tests the earliest occurrence survives and the first relation found wins
    // Verified by searching representatives from the highest index down
    #[test]
    fn test_duplicates_fold_onto_earliest() {
        let a = dot(1, 2, 1);
        let mut table = single(vec![a, dot(5, 5, 2), a.mirrored(), a]);
        let mut metasprite = Metasprite::with_sprites(vec![on(0), on(1), on(2), on(3)]);

        let removed = remove_duplicate_tiles(
            &mut table,
            &mut [&mut metasprite],
            MatchOptions::new(true, false),
        );

        assert_eq!(removed, 2);
        assert_eq!(table.tiles(), &[a, dot(5, 5, 2)]);
        let placed: Vec<(u8, SpriteFlags)> =
            metasprite.iter().map(|s| (s.tile, s.flags)).collect();
        assert_eq!(
            placed,
            vec![
                (0, SpriteFlags::empty()),
                (1, SpriteFlags::empty()),
                (0, SpriteFlags::MIRROR),
                (0, SpriteFlags::empty()),
            ]
        );
    }

    // Tests every metasprite sharing a table is rewritten
    // Verified by remapping only the first list
    #[test]
    fn test_duplicates_rewrite_all_lists() {
        let a = dot(0, 3, 1);
        let mut table = single(vec![a, dot(4, 4, 1), a.flipped()]);
        let mut first = Metasprite::with_sprites(vec![on(2)]);
        let mut second = Metasprite::with_sprites(vec![on(1), on(2)]);

        remove_duplicate_tiles(
            &mut table,
            &mut [&mut first, &mut second],
            MatchOptions::new(false, true),
        );

        assert_eq!(first.sprites(), &[Sprite::new(0, 0, 0, SpriteFlags::FLIP)]);
        assert_eq!(
            second.sprites(),
            &[on(1), Sprite::new(0, 0, 0, SpriteFlags::FLIP)]
        );
    }

    // Tests cleanup keeps every rendered pixel and leaves no redundancy behind
    // Verified by overwriting flags instead of toggling them on redirect
    #[test]
    fn test_canonicalize_preserves_rendering() {
        let mut rng = StdRng::seed_from_u64(42);
        let bases: Vec<Tile> = (0..6)
            .map(|_| dot(rng.random_range(0..8), rng.random_range(0..8), rng.random_range(1..4)))
            .collect();

        let tiles: Vec<Tile> = (0..48)
            .map(|_| {
                let base = bases
                    .get(rng.random_range(0..bases.len()))
                    .copied()
                    .unwrap_or_default();
                match rng.random_range(0..5) {
                    0 => Tile::default(),
                    1 => base.mirrored(),
                    2 => base.flipped(),
                    3 => base.mirrored().flipped(),
                    _ => base,
                }
            })
            .collect();
        let original = single(tiles);
        let mut sprites: Vec<Sprite> = (0..48)
            .map(|i| Sprite::new(0, 0, i, SpriteFlags::with_palette(1)))
            .collect();
        sprites.push(Sprite::new(0, 0, 5, SpriteFlags::MIRROR | SpriteFlags::FLIP));
        let source = Metasprite::with_sprites(sprites);

        let mut table = original.clone();
        let mut metasprite = source.clone();
        let report = canonicalize(&mut table, &mut metasprite, MatchOptions::ALL);

        assert_eq!(report.remaining_tiles, table.len());
        assert!(table.len() <= bases.len());

        let survivors = source
            .iter()
            .filter(|s| original.get(s.position()).is_some_and(|t| !t.is_empty()));
        let mut kept = metasprite.iter();
        for before in survivors {
            let after = kept.next().copied().unwrap_or_default();
            assert_eq!(after.flags.palette(), before.flags.palette());
            for y in 0..TILE_PIXELS {
                for x in 0..TILE_PIXELS {
                    assert_eq!(
                        rendered(&table, &after, x, y),
                        rendered(&original, before, x, y)
                    );
                }
            }
        }
        assert!(kept.next().is_none());

        let mut again_table = table.clone();
        let mut again = metasprite.clone();
        let second = canonicalize(&mut again_table, &mut again, MatchOptions::ALL);
        assert_eq!(second.blank_units + second.duplicate_units, 0);
        assert_eq!(again_table, table);
        assert_eq!(again, metasprite);
    }

    // Tests 8x16 cleanup keeps every rendered pixel when flips swap the halves
    // Verified by comparing flipped units half against same half
    #[test]
    fn test_canonicalize_preserves_tall_rendering() {
        let mut rng = StdRng::seed_from_u64(7);
        let bases: Vec<[Tile; 2]> = (0..4)
            .map(|_| {
                let mut half = || {
                    dot(rng.random_range(0..8), rng.random_range(0..8), rng.random_range(1..4))
                };
                [half(), half()]
            })
            .collect();

        let tiles: Vec<Tile> = (0..24)
            .flat_map(|_| {
                let [top, bottom] = bases
                    .get(rng.random_range(0..bases.len()))
                    .copied()
                    .unwrap_or_default();
                match rng.random_range(0..5) {
                    0 => [Tile::default(), Tile::default()],
                    1 => [top.mirrored(), bottom.mirrored()],
                    2 => [bottom.flipped(), top.flipped()],
                    3 => [bottom.mirrored().flipped(), top.mirrored().flipped()],
                    _ => [top, bottom],
                }
            })
            .collect();
        let original = TileTable::with_tiles(tiles, TileLayout::Paired);
        let mut sprites: Vec<Sprite> = (0..24)
            .map(|unit| Sprite::new(0, 0, unit * 2, SpriteFlags::with_palette(2)))
            .collect();
        sprites.push(Sprite::new(0, 0, 6, SpriteFlags::MIRROR | SpriteFlags::FLIP));
        let source = Metasprite::with_sprites(sprites);

        let mut table = original.clone();
        let mut metasprite = source.clone();
        canonicalize(&mut table, &mut metasprite, MatchOptions::ALL);

        assert_eq!(table.len() % 2, 0);
        assert!(table.len() <= 2 * bases.len());

        let survivors = source.iter().filter(|s| {
            (0..2).any(|half| original.get(s.position() + half).is_some_and(|t| !t.is_empty()))
        });
        let mut kept = metasprite.iter();
        for before in survivors {
            let after = kept.next().copied().unwrap_or_default();
            assert_eq!(after.tile % 2, 0);
            assert_eq!(after.flags.palette(), before.flags.palette());
            for y in 0..2 * TILE_PIXELS {
                for x in 0..TILE_PIXELS {
                    assert_eq!(
                        rendered_tall(&table, &after, x, y),
                        rendered_tall(&original, before, x, y)
                    );
                }
            }
        }
        assert!(kept.next().is_none());

        let mut again_table = table.clone();
        let mut again = metasprite.clone();
        let second = canonicalize(&mut again_table, &mut again, MatchOptions::ALL);
        assert_eq!(second.blank_units + second.duplicate_units, 0);
        assert_eq!(again_table, table);
    }

    // Tests concatenation rebases the new metasprite and folds shared tiles
    // Verified by skipping the bias before appending
    #[test]
    fn test_bank_concatenate() {
        let (a, b, c, d) = (dot(0, 0, 1), dot(1, 0, 1), dot(2, 0, 1), dot(3, 0, 1));
        let mut bank = TileBank::new(TileLayout::Single, MatchOptions::EXACT);

        let first = bank.concatenate(
            single(vec![a, b, c]),
            Metasprite::with_sprites(vec![on(0), on(2)]),
        );
        assert!(matches!(first, Ok(0)));

        let second = bank.concatenate(
            single(vec![a, d]),
            Metasprite::with_sprites(vec![on(0), on(1)]),
        );
        assert!(matches!(second, Ok(1)));

        assert_eq!(bank.table().tiles(), &[a, b, c, d]);
        assert_eq!(
            bank.metasprites(),
            &[
                Metasprite::with_sprites(vec![on(0), on(2)]),
                Metasprite::with_sprites(vec![on(0), on(3)]),
            ]
        );

        let (table, lists) = bank.into_parts();
        assert_eq!(table.len(), 4);
        assert_eq!(lists.len(), 2);
    }

    // Tests rebasing is checked before folding, leaving the bank untouched
    // Verified by folding duplicates before biasing the metasprite
    #[test]
    fn test_bank_rebase_overflow() {
        let numbered: Vec<Tile> = (0..200_u8)
            .map(|n| {
                let mut bytes = [0; TILE_BYTES];
                bytes[0] = n;
                bytes[1] = 1;
                Tile::from_bytes(&bytes)
            })
            .collect();
        let repeated: Vec<Tile> = numbered.iter().take(100).copied().collect();
        let mut bank = TileBank::new(TileLayout::Single, MatchOptions::EXACT);
        assert!(bank.concatenate(single(numbered), Metasprite::new()).is_ok());

        let overflow = bank.concatenate(single(repeated), Metasprite::with_sprites(vec![on(99)]));

        assert!(matches!(
            overflow,
            Err(ChrError::InvalidTileIndex { index: 299, .. })
        ));
        assert_eq!(bank.table().len(), 200);
        assert_eq!(bank.metasprites().len(), 1);
    }

    // Tests concatenation rejects mismatched layouts and dangling sprites
    // Verified by removing the validation step
    #[test]
    fn test_bank_concatenate_errors() {
        let mut bank = TileBank::new(TileLayout::Paired, MatchOptions::ALL);
        let wrong_layout = bank.concatenate(single(vec![dot(0, 0, 1)]), Metasprite::new());
        assert!(matches!(wrong_layout, Err(ChrError::InvalidSourceData { .. })));

        let pair = TileTable::with_tiles(vec![dot(0, 0, 1), dot(1, 1, 1)], TileLayout::Paired);
        let dangling = bank.concatenate(pair, Metasprite::with_sprites(vec![on(2)]));
        assert!(matches!(dangling, Err(ChrError::InvalidTileIndex { .. })));
        assert!(bank.table().is_empty());
        assert!(bank.metasprites().is_empty());
    }
}
