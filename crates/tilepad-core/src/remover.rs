use crate::compositing::blit_rgba;
use crate::error::{Result, TilePadError};
use crate::model::Rect;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, instrument};

/// Strips the gutters from a padded atlas laid out in grid order, giving back a
/// tight tile sheet.
///
/// The padded image is read as `cols x rows` cells of
/// `tile + 2 * padding`; partial cells at the right/bottom are dropped. Tile
/// `(c, r)` is taken from `(c * cell_w + padding, r * cell_h + padding)` and
/// written to `(c * tile_width, r * tile_height)`. Atlases generated with
/// reordering come back in their reordered grid order.
#[instrument(skip_all, fields(width = padded.width(), height = padded.height()))]
pub fn remove_padding(
    padded: &RgbaImage,
    tile_width: u32,
    tile_height: u32,
    padding: u32,
) -> Result<RgbaImage> {
    if tile_width == 0 || tile_height == 0 {
        return Err(TilePadError::InvalidConfig(format!(
            "tile size must be positive, got {}x{}",
            tile_width, tile_height
        )));
    }
    let gutter = 2 * padding as u64;
    let cell_w = tile_width as u64 + gutter;
    let cell_h = tile_height as u64 + gutter;
    let cols = (padded.width() as u64 / cell_w) as u32;
    let rows = (padded.height() as u64 / cell_h) as u32;
    // cols * tile_width <= padded.width(), so these fit
    let mut out = RgbaImage::new(cols * tile_width, rows * tile_height);

    for r in 0..rows {
        for c in 0..cols {
            let sx = (c as u64 * cell_w) as u32 + padding;
            let sy = (r as u64 * cell_h) as u32 + padding;
            let from = Rect::new(sx, sy, tile_width, tile_height);
            blit_rgba(padded, &mut out, &from, c * tile_width, r * tile_height);
        }
    }
    debug!(cols, rows, "padding removed");
    Ok(out)
}

/// Same as [`remove_padding`] for any decoded image.
pub fn remove_padding_image(
    padded: &DynamicImage,
    tile_width: u32,
    tile_height: u32,
    padding: u32,
) -> Result<RgbaImage> {
    remove_padding(&padded.to_rgba8(), tile_width, tile_height, padding)
}
