use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use crate::error::CursorResult;

/// Pixel layouts a pixmap can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Alpha,
    Intensity,
    LuminanceAlpha,
    Rgb565,
    Rgba4444,
    Rgb888,
    Rgba8888,
}

impl PixelFormat {
    fn from_image(image: &DynamicImage) -> Option<Self> {
        match image {
            DynamicImage::ImageLuma8(_) => Some(PixelFormat::Intensity),
            DynamicImage::ImageLumaA8(_) => Some(PixelFormat::LuminanceAlpha),
            DynamicImage::ImageRgb8(_) => Some(PixelFormat::Rgb888),
            DynamicImage::ImageRgba8(_) => Some(PixelFormat::Rgba8888),
            _ => None,
        }
    }

    // Packed 16-bit formats are held unpacked in the nearest 8-bit layout
    fn blank_image(self, width: u32, height: u32) -> DynamicImage {
        match self {
            PixelFormat::Alpha | PixelFormat::Intensity => {
                DynamicImage::ImageLuma8(GrayImage::new(width, height))
            }
            PixelFormat::LuminanceAlpha => {
                DynamicImage::ImageLumaA8(GrayAlphaImage::new(width, height))
            }
            PixelFormat::Rgb565 | PixelFormat::Rgb888 => {
                DynamicImage::ImageRgb8(RgbImage::new(width, height))
            }
            PixelFormat::Rgba4444 | PixelFormat::Rgba8888 => {
                DynamicImage::ImageRgba8(RgbaImage::new(width, height))
            }
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Alpha => "Alpha",
            PixelFormat::Intensity => "Intensity",
            PixelFormat::LuminanceAlpha => "LuminanceAlpha",
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Rgba4444 => "RGBA4444",
            PixelFormat::Rgb888 => "RGB888",
            PixelFormat::Rgba8888 => "RGBA8888",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Pixmap {
    image: DynamicImage,
    format: PixelFormat,
}

impl Pixmap {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            image: format.blank_image(width, height),
            format,
        }
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::ImageRgba8(image),
            format: PixelFormat::Rgba8888,
        }
    }

    /// Wraps a decoded image. Layouts without a matching format
    /// (16-bit, float) are converted to RGBA8888.
    pub fn from_image(image: DynamicImage) -> Self {
        match PixelFormat::from_image(&image) {
            Some(format) => Self { image, format },
            None => Self::from_rgba(image.to_rgba8()),
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> CursorResult<Self> {
        let image = image::open(path)?;
        Ok(Self::from_image(image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn to_rgba8888(&self) -> Pixmap {
        Self::from_rgba(self.image.to_rgba8())
    }

    pub fn to_png_bytes(&self) -> CursorResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// `data:image/png;base64,...` URL of the PNG encoding.
    pub fn to_data_url(&self) -> CursorResult<String> {
        let bytes = self.to_png_bytes()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
    }
}
