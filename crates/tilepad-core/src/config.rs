use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Parameters for one atlas generation run.
/// Key notes:
///   - `padding` is the gutter on each side of a tile, so a cell is `tile + 2 * padding`
///   - `reorder` only takes effect together with `force_pot`
///   - `background_color` is ignored while `transparent` is set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Source tile width in pixels.
    pub tile_width: u32,
    /// Source tile height in pixels.
    pub tile_height: u32,
    /// Bleed pixels added on every side of each tile.
    pub padding: u32,
    /// Round target width and height up to powers of two (independently).
    pub force_pot: bool,
    /// Reflow tiles into the space gained by power-of-two rounding.
    pub reorder: bool,
    /// Fill the target with transparent pixels instead of `background_color`.
    pub transparent: bool,
    pub background_color: Color,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            tile_width: 16,
            tile_height: 16,
            padding: 1,
            force_pot: true,
            reorder: false,
            transparent: true,
            background_color: Color::MAGENTA,
        }
    }
}

impl GenerationConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - A tile dimension is zero
    /// - `tile + 2 * padding` does not fit in a `u32`
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::TilePadError;

        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(TilePadError::InvalidConfig(format!(
                "tile size must be positive, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }

        let gutter = 2 * self.padding as u64;
        if self.tile_width as u64 + gutter > u32::MAX as u64
            || self.tile_height as u64 + gutter > u32::MAX as u64
        {
            return Err(TilePadError::InvalidConfig(format!(
                "cell size {}x{} + 2 * {} overflows",
                self.tile_width, self.tile_height, self.padding
            )));
        }

        Ok(())
    }

    /// Tile plus gutter on both sides. Only meaningful after `validate`.
    pub fn cell_size(&self) -> (u32, u32) {
        (
            self.tile_width + 2 * self.padding,
            self.tile_height + 2 * self.padding,
        )
    }

    /// True when tiles are reflowed across source rows.
    pub fn reorders(&self) -> bool {
        self.force_pot && self.reorder
    }

    /// The fill color for the target, honoring `transparent`.
    pub fn fill_color(&self) -> Color {
        if self.transparent {
            Color::TRANSPARENT
        } else {
            self.background_color
        }
    }
}

/// Builder for `GenerationConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct GenerationConfigBuilder {
    cfg: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: GenerationConfig::default(),
        }
    }
    pub fn with_tile_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.tile_width = w;
        self.cfg.tile_height = h;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.cfg.force_pot = v;
        self
    }
    pub fn reorder(mut self, v: bool) -> Self {
        self.cfg.reorder = v;
        self
    }
    pub fn transparent(mut self, v: bool) -> Self {
        self.cfg.transparent = v;
        self
    }
    pub fn background(mut self, c: Color) -> Self {
        self.cfg.background_color = c;
        self
    }
    pub fn build(self) -> GenerationConfig {
        self.cfg
    }
}

impl GenerationConfig {
    /// Create a fluent builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::new()
    }
}
