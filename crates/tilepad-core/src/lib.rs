//! Core library for turning tile sheets into padded tile atlases.
//!
//! - Grid: whole tiles only, cells of `tile + 2 * padding`, optional power-of-two target
//! - Layout: sequential (source grid order) or reordered into the enlarged target
//! - Compositing: background fill, tile blit, edge bleeding into the gutters
//! - Extras: padding removal, JSON placement metadata, project files
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use tilepad_core::{GenerationConfig, generate_image};
//! # fn main() -> anyhow::Result<()> {
//! let sheet = ImageReader::open("tiles.png")?.decode()?;
//! let cfg = GenerationConfig::builder()
//!     .with_tile_size(16, 16)
//!     .padding(2)
//!     .pow2(true)
//!     .build();
//! let out = generate_image(&sheet, &cfg)?;
//! out.rgba.save("tiles.export.png")?;
//! println!("{}", out.stats().summary());
//! # Ok(()) }
//! ```

pub mod color;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod project;
pub mod remover;

pub use color::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use grid::*;
pub use layout::*;
pub use model::*;
pub use pipeline::*;
pub use remover::*;

/// Convenience prelude for common types and functions.
/// Importing `tilepad_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{GenerationConfig, GenerationConfigBuilder};
    pub use crate::error::TilePadError;
    pub use crate::grid::GridLayout;
    pub use crate::layout::{PlacementMode, TilePlacement};
    pub use crate::model::{AtlasMeta, AtlasStats, Axis, Rect};
    pub use crate::project::{FileEntry, Project, ProjectSettings};
    pub use crate::{AtlasOutput, generate, generate_image, remove_padding, to_json};
}
