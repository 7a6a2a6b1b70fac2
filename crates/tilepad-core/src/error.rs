use crate::model::Axis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TilePadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Target {axis} of {required}px has no power of two up to 2^{max_exponent}")]
    PowerOfTwoOverflow {
        axis: Axis,
        required: u64,
        max_exponent: u32,
    },
    #[error("Target {axis} of {required}px does not fit in an image")]
    TargetTooLarge { axis: Axis, required: u64 },
    #[error("Reordered tiles need {required}px of height but the target is {available}px")]
    ReorderOverflow { required: u64, available: u32 },
}

pub type Result<T> = std::result::Result<T, TilePadError>;
