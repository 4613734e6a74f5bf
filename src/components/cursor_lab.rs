use super::Component;
use crate::event::AppMsg;
use crate::widgets::common::{field_line, focused_block};
use crate::widgets::theme::get_theme;
use backendcfg::cursor::profile::SAMPLE_USER_AGENTS;
use backendcfg::cursor::sheet::{CursorSource, load_cursor_sources};
use backendcfg::cursor::{BrowserCursor, BrowserProfile, Cursor, Pixmap, SystemCursor};
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget, Wrap},
};
use ratatui_image::{StatefulImage, picker::Picker, protocol::StatefulProtocol};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:image/png;base64,([A-Za-z0-9+/=]+)").expect("data URL pattern is valid")
});

/// Shortens embedded PNG data URLs so the CSS stays readable.
pub fn abbreviate_data_urls(css: &str) -> String {
    DATA_URL
        .replace_all(css, |caps: &regex::Captures| {
            format!("data:image/png;base64,…({} chars)", caps[1].len())
        })
        .into_owned()
}

/// What the lab builds a cursor from.
pub enum LabSource {
    Empty,
    /// A single image file, kept in its decoded pixel format.
    Image(PathBuf),
    /// A cursor folder; `index` picks the cursor shown.
    Folder {
        path: PathBuf,
        sources: Vec<CursorSource>,
        index: usize,
    },
    System(SystemCursor),
}

/// Builds browser cursors interactively and shows the resulting CSS.
pub struct CursorLabState {
    pub source: LabSource,
    pub pixmaps: Vec<Pixmap>,
    pub hotspot: (u32, u32),
    pub agent_index: usize,
    pub cursor: Option<BrowserCursor>,
    pub error: Option<String>,
    picker: Option<Picker>,
    image_state: Option<StatefulProtocol>,
}

impl CursorLabState {
    pub fn new(picker: Option<Picker>) -> Self {
        Self {
            source: LabSource::Empty,
            pixmaps: Vec::new(),
            hotspot: (0, 0),
            agent_index: 0,
            cursor: None,
            error: None,
            picker,
            image_state: None,
        }
    }

    pub fn profile(&self) -> BrowserProfile {
        BrowserProfile::from_user_agent(SAMPLE_USER_AGENTS[self.agent_index].1)
    }

    pub fn load(&mut self, path: &Path) -> AppMsg {
        let result = if path.is_dir() {
            self.load_folder(path)
        } else {
            self.load_image(path)
        };
        match result {
            Ok(label) => AppMsg::LogMessage(format!("Loaded {}", label)),
            Err(e) => AppMsg::ErrorOccurred(e),
        }
    }

    fn load_image(&mut self, path: &Path) -> Result<String, String> {
        let pixmap = Pixmap::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let label = format!("{} ({}x{} {})", path.display(), pixmap.width(), pixmap.height(), pixmap.format());
        self.source = LabSource::Image(path.to_path_buf());
        self.hotspot = (0, 0);
        self.set_pixmaps(vec![pixmap]);
        Ok(label)
    }

    fn load_folder(&mut self, path: &Path) -> Result<String, String> {
        let sources = load_cursor_sources(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        if sources.is_empty() {
            return Err(format!("No cursor folders with a .conf file in {}", path.display()));
        }
        let label = format!("{} cursors from {}", sources.len(), path.display());
        self.source = LabSource::Folder {
            path: path.to_path_buf(),
            sources,
            index: 0,
        };
        self.select_folder_cursor(0);
        Ok(label)
    }

    fn select_folder_cursor(&mut self, step: isize) {
        let LabSource::Folder { sources, index, .. } = &mut self.source else {
            return;
        };
        let len = sources.len() as isize;
        *index = (*index as isize + step).rem_euclid(len) as usize;
        let source = &sources[*index];
        let hotspot = source.hotspot();
        let loaded = source.load_pixmaps();

        self.hotspot = hotspot;
        match loaded {
            Ok(pixmaps) => self.set_pixmaps(pixmaps),
            Err(e) => {
                self.pixmaps.clear();
                self.image_state = None;
                self.cursor = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn set_pixmaps(&mut self, pixmaps: Vec<Pixmap>) {
        self.image_state = match (&self.picker, pixmaps.first()) {
            (Some(picker), Some(primary)) => Some(picker.new_resize_protocol(primary.image().clone())),
            _ => None,
        };
        self.pixmaps = pixmaps;
        self.rebuild();
    }

    fn cycle_system_cursor(&mut self) {
        let next = match self.source {
            LabSource::System(current) => {
                let ix = SystemCursor::ALL.iter().position(|c| *c == current).unwrap_or(0);
                SystemCursor::ALL[(ix + 1) % SystemCursor::ALL.len()]
            }
            _ => SystemCursor::ALL[0],
        };
        self.source = LabSource::System(next);
        self.pixmaps.clear();
        self.image_state = None;
        self.rebuild();
    }

    fn convert_to_rgba(&mut self) -> Option<AppMsg> {
        if self.pixmaps.is_empty() {
            return None;
        }
        let converted = self.pixmaps.iter().map(Pixmap::to_rgba8888).collect();
        self.set_pixmaps(converted);
        Some(AppMsg::LogMessage("Converted images to RGBA8888".to_string()))
    }

    fn move_hotspot(&mut self, dx: i64, dy: i64) {
        let Some(primary) = self.pixmaps.first() else {
            return;
        };
        // one step past the edge is allowed so the bounds error can be seen
        let x = (self.hotspot.0 as i64 + dx).clamp(0, primary.width() as i64);
        let y = (self.hotspot.1 as i64 + dy).clamp(0, primary.height() as i64);
        self.hotspot = (x as u32, y as u32);
        self.rebuild();
    }

    /// Recreates the cursor from the current inputs.
    pub fn rebuild(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.dispose();
        }
        let built = match &self.source {
            LabSource::Empty => Ok(BrowserCursor::auto()),
            LabSource::System(cursor) => Ok(BrowserCursor::system(*cursor)),
            LabSource::Image(_) | LabSource::Folder { .. } => {
                BrowserCursor::new(&self.pixmaps, self.hotspot.0, self.hotspot.1, self.profile())
            }
        };
        match built {
            Ok(cursor) => {
                self.cursor = Some(cursor);
                self.error = None;
            }
            Err(e) => {
                self.cursor = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn source_label(&self) -> String {
        match &self.source {
            LabSource::Empty => "none".to_string(),
            LabSource::Image(path) => path.display().to_string(),
            LabSource::Folder { path, sources, index } => format!(
                "{} [{}/{}] {}",
                path.display(),
                index + 1,
                sources.len(),
                sources[*index].name
            ),
            LabSource::System(cursor) => format!("system {:?}", cursor),
        }
    }
}

impl Component for CursorLabState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::PathSelected(path) => Some(self.load(path)),
            AppMsg::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.move_hotspot(-1, 0);
                    None
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.move_hotspot(1, 0);
                    None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_hotspot(0, -1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_hotspot(0, 1);
                    None
                }
                KeyCode::Char('p') => {
                    self.agent_index = (self.agent_index + 1) % SAMPLE_USER_AGENTS.len();
                    self.rebuild();
                    Some(AppMsg::LogMessage(format!(
                        "Browser profile: {}",
                        SAMPLE_USER_AGENTS[self.agent_index].0
                    )))
                }
                KeyCode::Char('c') => self.convert_to_rgba(),
                KeyCode::Char('n') => {
                    self.cycle_system_cursor();
                    None
                }
                KeyCode::Char(']') => {
                    self.select_folder_cursor(1);
                    None
                }
                KeyCode::Char('[') => {
                    self.select_folder_cursor(-1);
                    None
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();
        let block = focused_block("Cursor Lab", is_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(20), Constraint::Min(10)])
            .split(inner);

        if let Some(state) = self.image_state.as_mut() {
            StatefulWidget::render(StatefulImage::default(), chunks[0], buf, state);
        } else {
            Paragraph::new("no image")
                .style(Style::default().fg(theme.text_secondary))
                .render(chunks[0], buf);
        }

        let (agent_name, _) = SAMPLE_USER_AGENTS[self.agent_index];
        let profile = self.profile();
        let mut lines = vec![
            field_line("Source", self.source_label()),
            field_line(
                "Browser",
                format!(
                    "{} (image-set: {}, webkit: {})",
                    agent_name, profile.image_set, profile.webkit_prefix
                ),
            ),
        ];
        for (i, pixmap) in self.pixmaps.iter().enumerate() {
            lines.push(field_line(
                "Image",
                format!("#{} {}x{} {}", i, pixmap.width(), pixmap.height(), pixmap.format()),
            ));
        }
        lines.push(field_line("Hotspot", format!("{}, {}", self.hotspot.0, self.hotspot.1)));
        lines.push(Line::default());

        match (&self.cursor, &self.error) {
            (_, Some(error)) => lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.status_failed),
            ))),
            (Some(cursor), None) => lines.push(Line::from(Span::styled(
                abbreviate_data_urls(&cursor.css_declaration()),
                Style::default().fg(theme.status_ok),
            ))),
            (None, None) => {}
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "arrows hotspot  p browser  c to RGBA  n system  [/] cursor",
            Style::default().fg(theme.text_secondary),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn key(code: KeyCode) -> AppMsg {
        AppMsg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_abbreviate_data_urls() {
        let css = "cursor: url('data:image/png;base64,iVBORw0KGgo=') 0 0, auto;";
        assert_eq!(
            abbreviate_data_urls(css),
            "cursor: url('data:image/png;base64,…(12 chars)') 0 0, auto;"
        );
    }

    #[test]
    fn test_empty_lab_is_auto() {
        let mut lab = CursorLabState::new(None);
        lab.rebuild();
        assert_eq!(lab.cursor.as_ref().unwrap().css_property(), "auto");
    }

    #[test]
    fn test_rgb_image_needs_conversion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arrow.png");
        RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])).save(&path).unwrap();

        let mut lab = CursorLabState::new(None);
        lab.update(&AppMsg::PathSelected(path));
        assert!(lab.cursor.is_none());
        assert!(lab.error.as_ref().unwrap().contains("RGBA8888"));

        lab.update(&key(KeyCode::Char('c')));
        assert!(lab.error.is_none());
        assert!(lab.cursor.as_ref().unwrap().css_property().starts_with("image-set("));
    }

    #[test]
    fn test_hotspot_past_edge_reports_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])).save(&path).unwrap();

        let mut lab = CursorLabState::new(None);
        lab.update(&AppMsg::PathSelected(path));
        for _ in 0..5 {
            lab.update(&key(KeyCode::Right));
        }
        assert_eq!(lab.hotspot, (2, 0));
        assert_eq!(
            lab.error.as_deref(),
            Some("xHotspot coordinate of 2 is not within image width bounds: [0, 1].")
        );

        lab.update(&key(KeyCode::Left));
        assert!(lab.cursor.is_some());
    }

    #[test]
    fn test_profiles_change_css_form() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])).save(&path).unwrap();

        let mut lab = CursorLabState::new(None);
        lab.update(&AppMsg::PathSelected(path));
        // Firefox 128 -> Firefox 87
        lab.update(&key(KeyCode::Char('p')));
        assert!(lab.cursor.as_ref().unwrap().css_property().starts_with("url('data:image/png;base64,"));
        // Chrome 126
        lab.update(&key(KeyCode::Char('p')));
        assert!(lab.cursor.as_ref().unwrap().css_property().starts_with("-webkit-image-set("));
    }

    #[test]
    fn test_system_cursors_cycle() {
        let mut lab = CursorLabState::new(None);
        lab.update(&key(KeyCode::Char('n')));
        assert_eq!(
            lab.cursor.as_ref().unwrap().css_property(),
            SystemCursor::ALL[0].css_name()
        );
        lab.update(&key(KeyCode::Char('n')));
        assert_eq!(
            lab.cursor.as_ref().unwrap().css_property(),
            SystemCursor::ALL[1].css_name()
        );
    }
}
