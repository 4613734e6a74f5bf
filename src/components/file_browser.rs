use super::Component;
use crate::event::AppMsg;
use crate::widgets::common::focused_block;
use crate::widgets::theme::get_theme;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct FileBrowserState {
    pub current_dir: PathBuf,
    pub initial_root: PathBuf,
    pub entries: Vec<PathBuf>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub last_refresh: Instant,
}

impl FileBrowserState {
    pub fn new(root: PathBuf) -> Self {
        let mut state = Self {
            current_dir: root.clone(),
            initial_root: root,
            entries: Vec::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
            last_refresh: Instant::now(),
        };
        state.refresh_entries();
        if !state.entries.is_empty() {
            state.list_state.select(Some(0));
        }
        state
    }

    fn refresh_entries(&mut self) {
        self.entries.clear();

        if self.current_dir.parent().is_some() && self.current_dir != self.initial_root {
            self.entries.push(PathBuf::from(".."));
        }

        if let Ok(entries) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                } else if is_png(&path) {
                    files.push(path);
                }
            }

            dirs.sort();
            files.sort();

            self.entries.extend(dirs);
            self.entries.extend(files);
        }
    }

    fn change_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
        self.refresh_entries();
        self.list_state.select(if self.entries.is_empty() { None } else { Some(0) });
        self.scroll_state = self.scroll_state.position(0);
    }

    /// Descends into directories; returns the path of a selected PNG.
    fn enter_selected(&mut self) -> Option<PathBuf> {
        let path = self.list_state.selected().and_then(|idx| self.entries.get(idx))?.clone();
        if path.as_os_str() == ".." {
            if let Some(parent) = self.current_dir.parent() {
                self.change_dir(parent.to_path_buf());
            }
            None
        } else if path.is_dir() {
            self.change_dir(path);
            None
        } else {
            Some(path)
        }
    }

    fn move_selection(&mut self, down: bool) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        let i = match (self.list_state.selected(), down) {
            (Some(i), true) if i >= last => 0,
            (Some(i), true) => i + 1,
            (Some(0), false) => last,
            (Some(i), false) => i - 1,
            (None, _) => 0,
        };
        self.list_state.select(Some(i));
        self.scroll_state = self.scroll_state.position(i);
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

impl Component for FileBrowserState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::Tick => {
                if self.last_refresh.elapsed() >= Duration::from_secs(1) {
                    self.refresh_entries();
                    self.last_refresh = Instant::now();

                    if let Some(selected) = self.list_state.selected()
                        && selected >= self.entries.len()
                    {
                        let new_selected = self.entries.len().checked_sub(1);
                        self.list_state.select(new_selected);
                    }
                }
                None
            }
            AppMsg::Key(key) => match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection(true);
                    None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection(false);
                    None
                }
                KeyCode::Enter => self.enter_selected().map(AppMsg::PathSelected),
                KeyCode::Backspace => {
                    if self.current_dir != self.initial_root
                        && let Some(parent) = self.current_dir.parent()
                    {
                        self.change_dir(parent.to_path_buf());
                    }
                    None
                }
                KeyCode::Char('l') => Some(AppMsg::PathSelected(self.current_dir.clone())),
                KeyCode::Char('e') => Some(AppMsg::ExportRequested(self.current_dir.clone())),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let icon = if entry.is_dir() || entry.as_os_str() == ".." { "📁" } else { "🖼" };
                let name = entry.file_name().unwrap_or(entry.as_os_str()).to_string_lossy();
                ListItem::new(format!("{} {}", icon, name)).style(Style::default().fg(theme.text_primary))
            })
            .collect();

        let title = format!("Files: {}", self.current_dir.display());
        let block = focused_block(&title, is_focused);
        let inner_area = block.inner(area);
        block.render(area, buf);

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(theme.text_highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        StatefulWidget::render(list, inner_area, buf, &mut self.list_state);

        self.scroll_state = self.scroll_state.content_length(self.entries.len());

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));

        scrollbar.render(inner_area, buf, &mut self.scroll_state);
    }
}
