use image::{Rgba, RgbaImage, imageops};
use rand::{Rng, SeedableRng};
use tilepad_core::prelude::*;

fn noise(w: u32, h: u32, seed: u64) -> RgbaImage {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(w, h, |_, _| Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), 255]))
}

#[test]
fn strips_what_generation_added() {
    let src = noise(70, 45, 11);
    let cfg = GenerationConfig::builder()
        .with_tile_size(10, 15)
        .padding(3)
        .pow2(false)
        .build();
    let padded = generate(&src, &cfg).expect("generate");
    let tight = remove_padding(&padded.rgba, 10, 15, 3).expect("remove");
    assert_eq!(tight.dimensions(), (70, 45));
    assert_eq!(tight, src);
}

#[test]
fn partial_source_tiles_do_not_come_back() {
    let src = noise(37, 20, 12);
    let cfg = GenerationConfig::builder()
        .with_tile_size(8, 8)
        .padding(1)
        .pow2(false)
        .build();
    let padded = generate(&src, &cfg).expect("generate");
    let tight = remove_padding(&padded.rgba, 8, 8, 1).expect("remove");
    assert_eq!(tight.dimensions(), (32, 16));
    let cropped = imageops::crop_imm(&src, 0, 0, 32, 16).to_image();
    assert_eq!(tight, cropped);
}

#[test]
fn pot_dead_space_reads_as_empty_tiles() {
    // 2 tiles of 16 + 2 gutter: target 64x32 holds 3 whole cells
    let src = RgbaImage::from_pixel(32, 16, Rgba([200, 100, 50, 255]));
    let cfg = GenerationConfig::builder()
        .with_tile_size(16, 16)
        .padding(1)
        .pow2(true)
        .build();
    let padded = generate(&src, &cfg).expect("generate");
    assert_eq!(padded.rgba.dimensions(), (64, 32));
    let tight = remove_padding(&padded.rgba, 16, 16, 1).expect("remove");
    assert_eq!(tight.dimensions(), (48, 16));
    assert_eq!(*tight.get_pixel(31, 15), Rgba([200, 100, 50, 255]));
    assert_eq!(*tight.get_pixel(40, 8), Rgba([0, 0, 0, 0]));
}

#[test]
fn zero_padding_is_identity_on_whole_tiles() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    for seed in 0..20 {
        let tile = rng.gen_range(1..=12u32);
        let src = noise(tile * rng.gen_range(1..=5), tile * rng.gen_range(1..=5), seed);
        let tight = remove_padding(&src, tile, tile, 0).expect("remove");
        assert_eq!(tight, src);
    }
}

#[test]
fn zero_tile_size_is_invalid() {
    let err = remove_padding(&RgbaImage::new(10, 10), 0, 4, 1).unwrap_err();
    assert!(matches!(err, TilePadError::InvalidConfig(_)));
}

#[test]
fn image_smaller_than_a_cell_gives_empty_output() {
    let tight = remove_padding(&RgbaImage::new(10, 10), 8, 8, 2).expect("remove");
    assert_eq!(tight.dimensions(), (0, 0));
}
