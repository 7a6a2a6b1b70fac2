use crate::color::Color;
use crate::config::GenerationConfig;
use crate::grid::GridLayout;
use crate::layout::TilePlacement;
use crate::model::Rect;
use image::RgbaImage;

/// Allocate the target image for `grid`, filled with transparent pixels or the
/// configured background color. Zero-area grids give an empty image.
pub fn allocate_target(grid: &GridLayout, cfg: &GenerationConfig) -> RgbaImage {
    let fill = cfg.fill_color();
    if fill == Color::TRANSPARENT {
        RgbaImage::new(grid.target_width, grid.target_height)
    } else {
        RgbaImage::from_pixel(grid.target_width, grid.target_height, fill.to_rgba())
    }
}

/// Copy every placed tile from `src` into `canvas`.
pub fn blit_tiles(src: &RgbaImage, canvas: &mut RgbaImage, placements: &[TilePlacement]) {
    for p in placements {
        blit_rgba(src, canvas, &p.source, p.target.x, p.target.y);
    }
}

/// Blit the `from` rectangle of `src` into `canvas` with its top-left at (dx, dy).
/// Pixels falling outside either image are skipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, from: &Rect, dx: u32, dy: u32) {
    let (sw, sh) = src.dimensions();
    let (cw, ch) = canvas.dimensions();
    for yy in 0..from.h {
        let (sy, ty) = (from.y + yy, dy + yy);
        if sy >= sh || ty >= ch {
            break;
        }
        for xx in 0..from.w {
            let (sx, tx) = (from.x + xx, dx + xx);
            if sx >= sw || tx >= cw {
                break;
            }
            canvas.put_pixel(tx, ty, *src.get_pixel(sx, sy));
        }
    }
}

/// Extrude tile edges `grid.padding` pixels into the gutters of every whole target cell.
///
/// Rows are extruded first across the full target width, then columns across
/// the full target height. The column pass reads rows the first pass already
/// filled, so each corner block of a gutter ends up with the nearest tile
/// corner pixel. Each offset copies from the fixed edge row/column, which makes
/// the operation idempotent. No-op when `padding == 0` or when `canvas` is not
/// the grid's target size.
pub fn bleed_edges(canvas: &mut RgbaImage, grid: &GridLayout) {
    let pad = grid.padding;
    let (cw, ch) = canvas.dimensions();
    if pad == 0 || grid.is_degenerate() || (cw, ch) != (grid.target_width, grid.target_height) {
        return;
    }
    let cols = grid.target_cols();
    let rows = grid.target_rows();

    for offset in 1..=pad {
        for j in 0..rows {
            let top = j * grid.cell_height + pad;
            let bottom = top + grid.tile_height - 1;
            for x in 0..cw {
                let p = *canvas.get_pixel(x, top);
                canvas.put_pixel(x, top - offset, p);
                let p = *canvas.get_pixel(x, bottom);
                canvas.put_pixel(x, bottom + offset, p);
            }
        }
    }

    for offset in 1..=pad {
        for i in 0..cols {
            let left = i * grid.cell_width + pad;
            let right = left + grid.tile_width - 1;
            for y in 0..ch {
                let p = *canvas.get_pixel(left, y);
                canvas.put_pixel(left - offset, y, p);
                let p = *canvas.get_pixel(right, y);
                canvas.put_pixel(right + offset, y, p);
            }
        }
    }
}
