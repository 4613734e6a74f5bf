// Browser cursor construction: pixmaps in, CSS `cursor` values out

pub mod pixmap;
pub mod profile;
pub mod sheet;
pub mod system;

pub use pixmap::{PixelFormat, Pixmap};
pub use profile::BrowserProfile;
pub use system::SystemCursor;

use crate::error::{CursorError, CursorResult};

/// A platform cursor that can be released.
pub trait Cursor {
    /// Releases platform resources. Calling it more than once is harmless.
    fn dispose(&mut self);
}

/// Cursor for a browser surface, held as the value of the CSS `cursor` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCursor {
    css_property: String,
}

impl BrowserCursor {
    /// Builds a cursor from one or more images of the same shape at different
    /// resolutions. The first pixmap is the 1x image and defines hotspot bounds.
    pub fn new(
        pixmaps: &[Pixmap],
        x_hotspot: u32,
        y_hotspot: u32,
        profile: BrowserProfile,
    ) -> CursorResult<Self> {
        check_pixmaps(pixmaps)?;
        let primary = &pixmaps[0];
        check_hotspot(x_hotspot, y_hotspot, primary)?;

        let css_property = if profile.image_set {
            let mut entries = Vec::with_capacity(pixmaps.len());
            for pixmap in pixmaps {
                let scale = pixmap.height() as f32 / primary.height() as f32;
                entries.push(format!(
                    "url('{}') {}x",
                    pixmap.to_data_url()?,
                    format_scale(scale)
                ));
            }
            let prefix = if profile.webkit_prefix { "-webkit-" } else { "" };
            format!(
                "{}image-set({}) {} {}, auto",
                prefix,
                entries.join(", "),
                x_hotspot,
                y_hotspot
            )
        } else {
            format!(
                "url('{}') {} {}, auto",
                primary.to_data_url()?,
                x_hotspot,
                y_hotspot
            )
        };

        Ok(Self { css_property })
    }

    pub fn from_pixmap(
        pixmap: &Pixmap,
        x_hotspot: u32,
        y_hotspot: u32,
        profile: BrowserProfile,
    ) -> CursorResult<Self> {
        Self::new(std::slice::from_ref(pixmap), x_hotspot, y_hotspot, profile)
    }

    /// Lets the browser choose.
    pub fn auto() -> Self {
        Self {
            css_property: "auto".to_string(),
        }
    }

    pub fn system(cursor: SystemCursor) -> Self {
        Self {
            css_property: cursor.css_name().to_string(),
        }
    }

    pub fn css_property(&self) -> &str {
        &self.css_property
    }

    pub fn css_declaration(&self) -> String {
        format!("cursor: {};", self.css_property)
    }
}

impl Cursor for BrowserCursor {
    // The browser owns the image data; nothing to release.
    fn dispose(&mut self) {}
}

fn check_pixmaps(pixmaps: &[Pixmap]) -> CursorResult<()> {
    if pixmaps.is_empty() {
        return Err(CursorError::NoImages);
    }

    for (index, pixmap) in pixmaps.iter().enumerate() {
        if pixmap.format() != PixelFormat::Rgba8888 {
            return Err(CursorError::InvalidFormat {
                index,
                format: pixmap.format(),
            });
        }
        if pixmap.width() < 1 {
            return Err(CursorError::InvalidWidth {
                index,
                width: pixmap.width(),
            });
        }
        if pixmap.height() < 1 {
            return Err(CursorError::InvalidHeight {
                index,
                height: pixmap.height(),
            });
        }
    }
    Ok(())
}

fn check_hotspot(x: u32, y: u32, pixmap: &Pixmap) -> CursorResult<()> {
    if x >= pixmap.width() {
        return Err(CursorError::HotspotX {
            x,
            max: pixmap.width() - 1,
        });
    }
    if y >= pixmap.height() {
        return Err(CursorError::HotspotY {
            y,
            max: pixmap.height() - 1,
        });
    }
    Ok(())
}

// Three decimals at most, no trailing zeros: 1 -> "1", 1.5 -> "1.5", 4/3 -> "1.333"
fn format_scale(scale: f32) -> String {
    let rounded = (scale * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn rgba(width: u32, height: u32) -> Pixmap {
        Pixmap::from_rgba(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
    }

    #[test]
    fn test_rejects_non_rgba_format() {
        let err = BrowserCursor::from_pixmap(
            &Pixmap::new(16, 16, PixelFormat::Rgb888),
            0,
            0,
            BrowserProfile::STANDARD,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CursorError::InvalidFormat {
                index: 0,
                format: PixelFormat::Rgb888
            }
        ));
        assert!(err.to_string().contains("not in RGBA8888 format"));
    }

    #[test]
    fn test_format_checked_on_every_pixmap() {
        let pixmaps = [rgba(16, 16), Pixmap::new(32, 32, PixelFormat::Rgba4444)];
        let err = BrowserCursor::new(&pixmaps, 0, 0, BrowserProfile::STANDARD).unwrap_err();
        assert!(matches!(err, CursorError::InvalidFormat { index: 1, .. }));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let err = BrowserCursor::from_pixmap(&rgba(0, 8), 0, 0, BrowserProfile::STANDARD)
            .unwrap_err();
        assert!(matches!(err, CursorError::InvalidWidth { index: 0, width: 0 }));

        let err = BrowserCursor::from_pixmap(&rgba(8, 0), 0, 0, BrowserProfile::STANDARD)
            .unwrap_err();
        assert!(matches!(err, CursorError::InvalidHeight { index: 0, height: 0 }));
    }

    #[test]
    fn test_hotspot_bounds() {
        let pm = rgba(16, 8);
        assert!(BrowserCursor::from_pixmap(&pm, 0, 0, BrowserProfile::STANDARD).is_ok());
        assert!(BrowserCursor::from_pixmap(&pm, 15, 7, BrowserProfile::STANDARD).is_ok());

        let err = BrowserCursor::from_pixmap(&pm, 16, 0, BrowserProfile::STANDARD).unwrap_err();
        assert!(matches!(err, CursorError::HotspotX { x: 16, max: 15 }));
        assert_eq!(
            err.to_string(),
            "xHotspot coordinate of 16 is not within image width bounds: [0, 15]."
        );

        let err = BrowserCursor::from_pixmap(&pm, 0, 8, BrowserProfile::STANDARD).unwrap_err();
        assert!(matches!(err, CursorError::HotspotY { y: 8, max: 7 }));
    }

    #[test]
    fn test_empty_pixmaps_rejected() {
        let err = BrowserCursor::new(&[], 0, 0, BrowserProfile::STANDARD).unwrap_err();
        assert!(matches!(err, CursorError::NoImages));
    }

    #[test]
    fn test_legacy_css() {
        let cursor = BrowserCursor::from_pixmap(&rgba(4, 4), 1, 2, BrowserProfile::LEGACY).unwrap();
        let css = cursor.css_property();
        assert!(css.starts_with("url('data:image/png;base64,"));
        assert!(css.ends_with("') 1 2, auto"));
    }

    #[test]
    fn test_image_set_css_with_scales() {
        let pixmaps = [rgba(16, 16), rgba(24, 24), rgba(32, 32)];
        let cursor = BrowserCursor::new(&pixmaps, 3, 4, BrowserProfile::STANDARD).unwrap();
        let css = cursor.css_property();

        assert!(css.starts_with("image-set(url('data:image/png;base64,"));
        assert!(css.contains("') 1x, url('"));
        assert!(css.contains("') 1.5x, url('"));
        assert!(css.ends_with("') 2x) 3 4, auto"));
        assert_eq!(css.matches("url(").count(), 3);
    }

    #[test]
    fn test_webkit_prefix() {
        let cursor = BrowserCursor::from_pixmap(&rgba(4, 4), 0, 0, BrowserProfile::WEBKIT).unwrap();
        assert!(cursor.css_property().starts_with("-webkit-image-set(url('"));
    }

    #[test]
    fn test_hotspot_checked_against_first_pixmap() {
        let pixmaps = [rgba(8, 8), rgba(16, 16)];
        assert!(BrowserCursor::new(&pixmaps, 8, 0, BrowserProfile::STANDARD).is_err());
    }

    #[test]
    fn test_system_and_auto() {
        assert_eq!(BrowserCursor::auto().css_property(), "auto");
        assert_eq!(
            BrowserCursor::system(SystemCursor::Ibeam).css_declaration(),
            "cursor: text;"
        );
    }

    #[test]
    fn test_dispose_twice() {
        let mut cursor = BrowserCursor::from_pixmap(&rgba(2, 2), 0, 0, BrowserProfile::LEGACY).unwrap();
        let before = cursor.clone();
        cursor.dispose();
        cursor.dispose();
        assert_eq!(cursor, before);
    }

    #[test]
    fn test_format_scale() {
        assert_eq!(format_scale(1.0), "1");
        assert_eq!(format_scale(2.0), "2");
        assert_eq!(format_scale(1.5), "1.5");
        assert_eq!(format_scale(4.0 / 3.0), "1.333");
        assert_eq!(format_scale(0.5), "0.5");
    }
}
