use thiserror::Error;

use crate::types::{Area, Coords, Dim};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("width {width} not in {min}..={max}")]
    WidthOutOfRange { width: Dim, min: Dim, max: Dim },
    #[error("height {height} not in {min}..={max}")]
    HeightOutOfRange { height: Dim, min: Dim, max: Dim },
    #[error("mine count {mines} not in 1..={max} for this board")]
    MineCountOutOfRange { mines: Area, max: Area },
    #[error("mine at {0:?} is outside the board")]
    MineOutsideBoard(Coords),
}

pub type Result<T> = core::result::Result<T, ConfigError>;
