use rand::{Rng, SeedableRng};
use tilepad_core::prelude::*;

fn is_pow2(v: u32) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

fn cfg(tile: (u32, u32), padding: u32, pot: bool) -> GenerationConfig {
    GenerationConfig::builder()
        .with_tile_size(tile.0, tile.1)
        .padding(padding)
        .pow2(pot)
        .build()
}

#[test]
fn two_by_two_without_padding() {
    let g = GridLayout::compute(32, 32, &cfg((16, 16), 0, false)).expect("grid");
    assert_eq!((g.cols, g.rows), (2, 2));
    assert_eq!((g.cell_width, g.cell_height), (16, 16));
    assert_eq!((g.target_width, g.target_height), (32, 32));
}

#[test]
fn single_row_rounds_each_axis_independently() {
    let g = GridLayout::compute(48, 16, &cfg((16, 16), 1, true)).expect("grid");
    assert_eq!((g.cols, g.rows), (3, 1));
    assert_eq!((g.raw_width, g.raw_height), (54, 18));
    assert_eq!((g.target_width, g.target_height), (64, 32));
}

#[test]
fn partial_tiles_are_dropped() {
    let g = GridLayout::compute(50, 40, &cfg((16, 16), 0, false)).expect("grid");
    assert_eq!((g.cols, g.rows), (3, 2));
    assert_eq!((g.target_width, g.target_height), (48, 32));
}

#[test]
fn exact_power_of_two_moves_to_the_next() {
    let g = GridLayout::compute(64, 128, &cfg((16, 16), 0, true)).expect("grid");
    assert_eq!((g.raw_width, g.raw_height), (64, 128));
    assert_eq!((g.target_width, g.target_height), (128, 256));
    assert_eq!((g.target_cols(), g.target_rows()), (8, 16));
}

#[test]
fn non_square_tiles() {
    let g = GridLayout::compute(100, 30, &cfg((20, 10), 2, false)).expect("grid");
    assert_eq!((g.cols, g.rows), (5, 3));
    assert_eq!((g.cell_width, g.cell_height), (24, 14));
    assert_eq!((g.target_width, g.target_height), (120, 42));
}

#[test]
fn zero_tile_width_is_invalid() {
    let err = GridLayout::compute(32, 32, &cfg((0, 16), 0, false)).unwrap_err();
    assert!(matches!(err, TilePadError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn zero_tile_height_is_invalid() {
    let err = GridLayout::compute(32, 32, &cfg((16, 0), 0, true)).unwrap_err();
    assert!(matches!(err, TilePadError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn oversized_padding_is_invalid() {
    let err = GridLayout::compute(32, 32, &cfg((16, 16), u32::MAX / 2, false)).unwrap_err();
    assert!(matches!(err, TilePadError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn pot_bound_is_two_to_the_thirty() {
    let ok = GridLayout::compute((1 << 30) - 1, 1, &cfg((1, 1), 0, true)).expect("grid");
    assert_eq!((ok.target_width, ok.target_height), (1 << 30, 2));

    let err = GridLayout::compute(1 << 30, 1, &cfg((1, 1), 0, true)).unwrap_err();
    match err {
        TilePadError::PowerOfTwoOverflow {
            axis,
            required,
            max_exponent,
        } => {
            assert_eq!(axis, Axis::Width);
            assert_eq!(required, 1 << 30);
            assert_eq!(max_exponent, 30);
        }
        other => panic!("expected PowerOfTwoOverflow, got {other:?}"),
    }
}

#[test]
fn pot_overflow_reports_height() {
    let err = GridLayout::compute(16, 1 << 31, &cfg((16, 1), 0, true)).unwrap_err();
    assert!(matches!(
        err,
        TilePadError::PowerOfTwoOverflow {
            axis: Axis::Height,
            ..
        }
    ));
}

#[test]
fn raw_size_beyond_u32_is_too_large() {
    let err = GridLayout::compute(1 << 31, 1, &cfg((1, 1), 1, false)).unwrap_err();
    assert!(matches!(
        err,
        TilePadError::TargetTooLarge {
            axis: Axis::Width,
            ..
        }
    ));
}

#[test]
fn degenerate_grid_skips_pot() {
    let g = GridLayout::compute(8, 64, &cfg((16, 16), 1, true)).expect("grid");
    assert!(g.is_degenerate());
    assert_eq!((g.cols, g.rows), (0, 4));
    assert_eq!((g.raw_width, g.raw_height), (0, 72));
    assert_eq!((g.target_width, g.target_height), (0, 0));
    assert_eq!(g.tile_count(), 0);
}

#[test]
fn random_grids_follow_formulas() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let sw = rng.gen_range(0..=600u32);
        let sh = rng.gen_range(0..=600u32);
        let tw = rng.gen_range(1..=64u32);
        let th = rng.gen_range(1..=64u32);
        let pad = rng.gen_range(0..=8u32);

        let plain = GridLayout::compute(sw, sh, &cfg((tw, th), pad, false)).expect("grid");
        assert_eq!(plain.cols, sw / tw);
        assert_eq!(plain.rows, sh / th);
        assert_eq!(plain.raw_width, plain.cols * (tw + 2 * pad));
        assert_eq!(plain.raw_height, plain.rows * (th + 2 * pad));
        if plain.is_degenerate() {
            assert_eq!((plain.target_width, plain.target_height), (0, 0));
        } else {
            assert_eq!(plain.target_width, plain.raw_width);
            assert_eq!(plain.target_height, plain.raw_height);
        }

        let unpadded = GridLayout::compute(sw, sh, &cfg((tw, th), 0, false)).expect("grid");
        assert_eq!((unpadded.cols, unpadded.rows), (plain.cols, plain.rows));

        let pot = GridLayout::compute(sw, sh, &cfg((tw, th), pad, true)).expect("grid");
        assert_eq!((pot.raw_width, pot.raw_height), (plain.raw_width, plain.raw_height));
        if pot.is_degenerate() {
            assert_eq!((pot.target_width, pot.target_height), (0, 0));
            continue;
        }
        for (target, raw) in [
            (pot.target_width, pot.raw_width),
            (pot.target_height, pot.raw_height),
        ] {
            assert!(is_pow2(target), "{target} is not a power of two");
            assert!(target > raw, "{target} vs raw {raw}");
            assert!((target as u64) <= 2 * raw as u64, "{target} vs raw {raw}");
            if is_pow2(raw) {
                assert_eq!(target, 2 * raw);
            }
        }
    }
}
