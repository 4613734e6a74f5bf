use thiserror::Error;

use crate::cursor::PixelFormat;

/// Rejections raised while building a cursor or exporting a stylesheet.
#[derive(Error, Debug)]
pub enum CursorError {
    #[error("Cursor image pixmap{index} is not in RGBA8888 format (found {format}).")]
    InvalidFormat { index: usize, format: PixelFormat },

    #[error("Cursor image pixmap{index} width of {width} is not greater than zero.")]
    InvalidWidth { index: usize, width: u32 },

    #[error("Cursor image pixmap{index} height of {height} is not greater than zero.")]
    InvalidHeight { index: usize, height: u32 },

    #[error("xHotspot coordinate of {x} is not within image width bounds: [0, {max}].")]
    HotspotX { x: u32, max: u32 },

    #[error("yHotspot coordinate of {y} is not within image height bounds: [0, {max}].")]
    HotspotY { y: u32, max: u32 },

    #[error("Cursor needs at least one image")]
    NoImages,

    #[error("Failed to encode cursor image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Cursor I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type CursorResult<T> = Result<T, CursorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
