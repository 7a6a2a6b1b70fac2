use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// Image axis, used to report which target dimension failed to size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

/// Atlas-level metadata written next to the generated image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasMeta {
    pub app: String,
    pub version: String,
    pub format: String,
    pub size: (u32, u32),
    pub tile_size: (u32, u32),
    pub padding: u32,
    pub grid: (u32, u32),
    pub power_of_two: bool,
    pub reorder: bool,
    pub background_color: Option<[u8; 4]>,
}

/// Space usage of a generated atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtlasStats {
    /// Number of tiles placed.
    pub tiles: usize,
    /// Target width * height.
    pub target_area: u64,
    /// Pixels covered by tile content (gutters excluded).
    pub tile_area: u64,
    /// Pixels covered by whole cells (tile plus gutter).
    pub cell_area: u64,
    /// tile_area / target_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl AtlasStats {
    pub fn summary(&self) -> String {
        format!(
            "Tiles: {}, Occupancy: {:.2}%, Target Area: {} px², Tile Area: {} px², Dead Area: {} px²",
            self.tiles,
            self.occupancy * 100.0,
            self.target_area,
            self.tile_area,
            self.dead_area(),
        )
    }

    /// Pixels outside every cell, i.e. space added by power-of-two rounding or reorder gaps.
    pub fn dead_area(&self) -> u64 {
        self.target_area.saturating_sub(self.cell_area)
    }
}
