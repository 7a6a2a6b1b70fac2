use crate::compositing::{allocate_target, bleed_edges, blit_tiles};
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::grid::GridLayout;
use crate::layout::{PlacementMode, TilePlacement, plan_placements};
use crate::model::{AtlasMeta, AtlasStats};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, instrument, warn};

/// Output of a generation run: the grid it was sized from, where every tile
/// went, and the padded RGBA atlas.
pub struct AtlasOutput {
    pub grid: GridLayout,
    pub mode: PlacementMode,
    pub placements: Vec<TilePlacement>,
    pub rgba: RgbaImage,
    pub config: GenerationConfig,
}

impl AtlasOutput {
    /// True when the source held no whole tile and the atlas has zero area.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn stats(&self) -> AtlasStats {
        let target_area = (self.grid.target_width as u64) * (self.grid.target_height as u64);
        let tile_area: u64 = self.placements.iter().map(|p| p.target.area()).sum();
        let cell_area: u64 = self
            .placements
            .iter()
            .map(|p| p.cell(self.grid.padding).area())
            .sum();
        let occupancy = if target_area > 0 {
            tile_area as f64 / target_area as f64
        } else {
            0.0
        };
        AtlasStats {
            tiles: self.placements.len(),
            target_area,
            tile_area,
            cell_area,
            occupancy,
        }
    }

    pub fn meta(&self) -> AtlasMeta {
        AtlasMeta {
            app: "tilepad".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            format: "RGBA8888".into(),
            size: (self.grid.target_width, self.grid.target_height),
            tile_size: (self.grid.tile_width, self.grid.tile_height),
            padding: self.grid.padding,
            grid: (self.grid.cols, self.grid.rows),
            power_of_two: self.config.force_pot,
            reorder: self.mode == PlacementMode::Reorder,
            background_color: (!self.config.transparent)
                .then(|| self.config.background_color.to_array()),
        }
    }
}

/// Packs the whole tiles of `source` into a padded atlas according to `cfg`.
///
/// Steps: size the grid, allocate the target, blit tiles (sequentially or
/// reordered), then bleed tile edges into the gutters. The image is returned
/// only when every step succeeds.
#[instrument(skip_all, fields(width = source.width(), height = source.height()))]
pub fn generate(source: &RgbaImage, cfg: &GenerationConfig) -> Result<AtlasOutput> {
    let grid = GridLayout::compute(source.width(), source.height(), cfg)?;
    if grid.is_degenerate() {
        warn!(
            tile_width = cfg.tile_width,
            tile_height = cfg.tile_height,
            "source holds no whole tile; atlas is empty"
        );
    }
    debug!(
        cols = grid.cols,
        rows = grid.rows,
        raw = ?(grid.raw_width, grid.raw_height),
        target = ?(grid.target_width, grid.target_height),
        "grid sized"
    );

    let mode = PlacementMode::from_config(cfg);
    let placements = plan_placements(&grid, mode)?;

    let mut canvas = allocate_target(&grid, cfg);
    blit_tiles(source, &mut canvas, &placements);
    bleed_edges(&mut canvas, &grid);
    debug!(tiles = placements.len(), ?mode, "atlas composed");

    Ok(AtlasOutput {
        grid,
        mode,
        placements,
        rgba: canvas,
        config: cfg.clone(),
    })
}

/// Same as [`generate`] for any decoded image; converts to RGBA8 first.
pub fn generate_image(source: &DynamicImage, cfg: &GenerationConfig) -> Result<AtlasOutput> {
    generate(&source.to_rgba8(), cfg)
}
