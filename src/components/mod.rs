use crate::event::AppMsg;
use ratatui::{buffer::Buffer, layout::Rect};

pub mod config_editor;
pub mod cursor_lab;
pub mod file_browser;
pub mod logs;
pub mod prefs_view;

pub trait Component {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg>;

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool);
}
