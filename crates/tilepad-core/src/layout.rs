use crate::config::GenerationConfig;
use crate::error::{Result, TilePadError};
use crate::grid::GridLayout;
use crate::model::Rect;
use serde::{Deserialize, Serialize};

/// How tiles are laid out in the target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Keep the source grid: one target row per source row.
    Sequential,
    /// Wrap whenever the cursor nears the target's right edge, ignoring source rows.
    Reorder,
}

impl PlacementMode {
    pub fn from_config(cfg: &GenerationConfig) -> Self {
        if cfg.reorders() {
            Self::Reorder
        } else {
            Self::Sequential
        }
    }
}

/// Where one source tile ends up in the target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TilePlacement {
    /// Row-major index in the source grid.
    pub index: usize,
    pub col: u32,
    pub row: u32,
    /// Tile rectangle within the source image.
    pub source: Rect,
    /// Tile content rectangle within the target (gutter excluded).
    pub target: Rect,
}

impl TilePlacement {
    /// The whole cell (content plus gutter) this tile occupies in the target.
    pub fn cell(&self, padding: u32) -> Rect {
        Rect::new(
            self.target.x - padding,
            self.target.y - padding,
            self.target.w + 2 * padding,
            self.target.h + 2 * padding,
        )
    }
}

/// Computes target positions for every whole tile of `grid`, in row-major source order.
///
/// In [`PlacementMode::Reorder`] the cursor wraps after a tile once
/// `x >= target_width - cell_width`, which may leave the last cell of a row unused.
/// A reordered layout that runs past the target's bottom edge is rejected rather
/// than clipped.
pub fn plan_placements(grid: &GridLayout, mode: PlacementMode) -> Result<Vec<TilePlacement>> {
    let mut out = Vec::with_capacity(grid.tile_count() as usize);
    if grid.is_degenerate() {
        return Ok(out);
    }

    let pad = grid.padding as u64;
    let cell_w = grid.cell_width as u64;
    let cell_h = grid.cell_height as u64;
    let wrap_at = grid.target_width.saturating_sub(grid.cell_width) as u64;

    // reorder cursor
    let mut x = pad;
    let mut y = pad;
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let (tx, ty) = match mode {
                PlacementMode::Sequential => grid.cell_origin(col, row),
                PlacementMode::Reorder => {
                    let bottom = y + grid.tile_height as u64 + pad;
                    if bottom > grid.target_height as u64 {
                        return Err(TilePadError::ReorderOverflow {
                            required: bottom,
                            available: grid.target_height,
                        });
                    }
                    // bounded by target_height above, and x stays below target_width
                    let at = (x as u32, y as u32);
                    x += cell_w;
                    if x >= wrap_at {
                        x = pad;
                        y += cell_h;
                    }
                    at
                }
            };
            out.push(TilePlacement {
                index: out.len(),
                col,
                row,
                source: grid.source_rect(col, row),
                target: Rect::new(tx, ty, grid.tile_width, grid.tile_height),
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(src: (u32, u32), tile: u32, pad: u32, pot: bool) -> GridLayout {
        let cfg = GenerationConfig::builder()
            .with_tile_size(tile, tile)
            .padding(pad)
            .pow2(pot)
            .build();
        GridLayout::compute(src.0, src.1, &cfg).expect("grid")
    }

    #[test]
    fn degenerate_grid_has_no_placements() {
        let g = grid((8, 64), 16, 1, true);
        assert!(plan_placements(&g, PlacementMode::Reorder).unwrap().is_empty());
    }

    #[test]
    fn cell_includes_gutter() {
        let g = grid((32, 16), 16, 2, false);
        let p = plan_placements(&g, PlacementMode::Sequential).unwrap();
        assert_eq!(p[1].cell(2), Rect::new(20, 0, 20, 20));
    }
}
