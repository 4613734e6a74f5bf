// Stylesheet export for folders of extracted cursor PNGs
//
// Each cursor lives in `<name>/<name>.conf` with lines of
// `size xhot yhot image [delay]`, the layout xcur2png writes.

use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{BrowserCursor, BrowserProfile, Pixmap};
use crate::error::CursorResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceVariant {
    pub size: u32,
    pub hotspot: (u32, u32),
    pub png_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSource {
    pub name: String,
    /// Sorted by ascending size, one entry per size.
    pub variants: Vec<SourceVariant>,
}

impl CursorSource {
    pub fn load_pixmaps(&self) -> CursorResult<Vec<Pixmap>> {
        self.variants
            .iter()
            .map(|v| Pixmap::open(&v.png_path).map(|pm| pm.to_rgba8888()))
            .collect()
    }

    /// The hotspot of the smallest size is the 1x hotspot.
    pub fn hotspot(&self) -> (u32, u32) {
        self.variants.first().map(|v| v.hotspot).unwrap_or((0, 0))
    }

    pub fn to_cursor(&self, profile: BrowserProfile) -> CursorResult<BrowserCursor> {
        let pixmaps = self.load_pixmaps()?;
        let (x, y) = self.hotspot();
        BrowserCursor::new(&pixmaps, x, y, profile)
    }
}

/// Parses a cursor `.conf`. Relative image paths resolve against `cursor_dir`.
/// Only the first frame of each size is kept, CSS cursors cannot animate.
pub fn parse_conf(content: &str, cursor_dir: &Path) -> Vec<SourceVariant> {
    let mut by_size: BTreeMap<u32, SourceVariant> = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_conf_line(line, cursor_dir) {
            Some(variant) => {
                by_size.entry(variant.size).or_insert(variant);
            }
            None => debug!("Skipping malformed line in {}: {:?}", cursor_dir.display(), line),
        }
    }

    by_size.into_values().collect()
}

/// `size xhot yhot image [delay]`; `None` when the line does not fit that shape.
fn parse_conf_line(line: &str, cursor_dir: &Path) -> Option<SourceVariant> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    // image names may contain spaces; a trailing integer is the frame delay
    let has_delay = parts.len() >= 5
        && parts
            .last()
            .map(|s| s.parse::<u32>().is_ok())
            .unwrap_or(false);
    let image = if has_delay {
        parts[3..parts.len() - 1].join(" ")
    } else {
        parts[3..].join(" ")
    };

    let size = parts[0].parse::<u32>().ok()?;
    let xhot = parts[1].parse::<u32>().ok()?;
    let yhot = parts[2].parse::<u32>().ok()?;

    let png_path = if Path::new(&image).is_absolute() {
        PathBuf::from(image)
    } else {
        cursor_dir.join(image)
    };

    Some(SourceVariant {
        size,
        hotspot: (xhot, yhot),
        png_path,
    })
}

fn load_cursor_dir(cursor_dir: &Path) -> CursorResult<Option<CursorSource>> {
    let Some(name) = cursor_dir.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };

    let conf = cursor_dir.join(format!("{}.conf", name));
    if !conf.is_file() {
        return Ok(None);
    }

    let variants = parse_conf(&fs::read_to_string(&conf)?, cursor_dir);
    if variants.is_empty() {
        return Ok(None);
    }

    Ok(Some(CursorSource {
        name: name.to_string(),
        variants,
    }))
}

/// Finds cursor folders in `dir`, or treats `dir` itself as one.
pub fn load_cursor_sources(dir: &Path) -> CursorResult<Vec<CursorSource>> {
    if let Some(source) = load_cursor_dir(dir)? {
        return Ok(vec![source]);
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(source) = load_cursor_dir(entry.path())? {
            sources.push(source);
        }
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub css: String,
    pub exported: usize,
    /// Cursor name and the reason it was left out.
    pub skipped: Vec<(String, String)>,
}

pub fn class_name(cursor_name: &str) -> String {
    let sanitized: String = cursor_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("cursor-{}", sanitized)
}

/// Encodes every source and renders one rule per cursor. Sources that fail are
/// skipped and reported instead of aborting the sheet.
pub fn build_stylesheet(sources: &[CursorSource], profile: BrowserProfile) -> Stylesheet {
    let results: Vec<(String, CursorResult<BrowserCursor>)> = sources
        .par_iter()
        .map(|source| (source.name.clone(), source.to_cursor(profile)))
        .collect();

    let mut sheet = Stylesheet::default();
    for (name, result) in results {
        match result {
            Ok(cursor) => {
                let _ = writeln!(
                    sheet.css,
                    ".{} {{\n  {}\n}}\n",
                    class_name(&name),
                    cursor.css_declaration()
                );
                sheet.exported += 1;
            }
            Err(e) => {
                warn!("Skipping cursor {}: {}", name, e);
                sheet.skipped.push((name, e.to_string()));
            }
        }
    }
    sheet
}

pub fn write_stylesheet(path: &Path, sheet: &Stylesheet) -> CursorResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &sheet.css)?;
    info!(
        "Wrote {} cursor rules to {}",
        sheet.exported,
        path.display()
    );
    Ok(())
}
