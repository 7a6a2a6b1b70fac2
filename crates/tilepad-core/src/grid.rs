use crate::config::GenerationConfig;
use crate::error::{Result, TilePadError};
use crate::model::{Axis, Rect};
use serde::{Deserialize, Serialize};

/// Largest exponent tried when rounding a target dimension up to a power of two.
pub const MAX_POT_EXPONENT: u32 = 30;

/// Tile grid derived from the source size and a [`GenerationConfig`].
///
/// `raw_*` is the tight size of all cells; `target_*` is what gets allocated,
/// which differs only when power-of-two rounding is on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub padding: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub raw_width: u32,
    pub raw_height: u32,
    pub target_width: u32,
    pub target_height: u32,
}

impl GridLayout {
    /// Sizes the grid for a `source_width x source_height` image.
    ///
    /// Partial tiles at the right/bottom of the source are dropped. A grid with
    /// no whole tile on either axis is degenerate: its target is 0x0 and it is
    /// never rounded to a power of two.
    pub fn compute(source_width: u32, source_height: u32, cfg: &GenerationConfig) -> Result<Self> {
        cfg.validate()?;

        let cols = source_width / cfg.tile_width;
        let rows = source_height / cfg.tile_height;
        let (cell_width, cell_height) = cfg.cell_size();
        let raw_w = cols as u64 * cell_width as u64;
        let raw_h = rows as u64 * cell_height as u64;
        let degenerate = cols == 0 || rows == 0;

        let (target_width, target_height) = if degenerate {
            (0, 0)
        } else if cfg.force_pot {
            (
                pot_dimension(raw_w, Axis::Width)?,
                pot_dimension(raw_h, Axis::Height)?,
            )
        } else {
            (fit_u32(raw_w, Axis::Width)?, fit_u32(raw_h, Axis::Height)?)
        };

        Ok(Self {
            cols,
            rows,
            tile_width: cfg.tile_width,
            tile_height: cfg.tile_height,
            padding: cfg.padding,
            cell_width,
            cell_height,
            raw_width: fit_u32(raw_w, Axis::Width)?,
            raw_height: fit_u32(raw_h, Axis::Height)?,
            target_width,
            target_height,
        })
    }

    pub fn tile_count(&self) -> u64 {
        self.cols as u64 * self.rows as u64
    }

    pub fn is_degenerate(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Whole cells that fit across the target width.
    pub fn target_cols(&self) -> u32 {
        self.target_width / self.cell_width
    }

    /// Whole cells that fit down the target height.
    pub fn target_rows(&self) -> u32 {
        self.target_height / self.cell_height
    }

    /// Source rectangle of tile `(col, row)`.
    pub fn source_rect(&self, col: u32, row: u32) -> Rect {
        Rect::new(
            col * self.tile_width,
            row * self.tile_height,
            self.tile_width,
            self.tile_height,
        )
    }

    /// Target content origin of cell `(col, row)` (gutter excluded).
    pub fn cell_origin(&self, col: u32, row: u32) -> (u32, u32) {
        (
            col * self.cell_width + self.padding,
            row * self.cell_height + self.padding,
        )
    }
}

/// Smallest power of two strictly greater than `v`, found by doubling from 1 up
/// to `2^MAX_POT_EXPONENT`. A `v` that already is a power of two moves up to the
/// next one.
/// Returns `None` when `v` is beyond the bound.
pub fn pow2_above(v: u64) -> Option<u32> {
    let mut size: u64 = 1;
    for _ in 0..=MAX_POT_EXPONENT {
        if v < size {
            return u32::try_from(size).ok();
        }
        size <<= 1;
    }
    None
}

fn pot_dimension(raw: u64, axis: Axis) -> Result<u32> {
    pow2_above(raw).ok_or(TilePadError::PowerOfTwoOverflow {
        axis,
        required: raw,
        max_exponent: MAX_POT_EXPONENT,
    })
}

fn fit_u32(v: u64, axis: Axis) -> Result<u32> {
    u32::try_from(v).map_err(|_| TilePadError::TargetTooLarge { axis, required: v })
}
