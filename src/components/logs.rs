use super::Component;
use crate::event::AppMsg;
use crate::widgets::common::focused_block;
use crate::widgets::theme::get_theme;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};

const MAX_LOG_LINES: usize = 1000;

#[derive(Debug)]
pub struct LogsState {
    pub logs: Vec<String>,
    scroll_state: ScrollbarState,
    scroll_offset: u16,
    stick_to_bottom: bool,
}

impl Default for LogsState {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            scroll_state: ScrollbarState::default(),
            scroll_offset: 0,
            stick_to_bottom: true,
        }
    }
}

impl LogsState {
    pub fn add_log(&mut self, message: String) {
        self.logs.push(message);
        if self.logs.len() > MAX_LOG_LINES {
            let excess = self.logs.len() - MAX_LOG_LINES;
            self.logs.drain(..excess);
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        if delta < 0 {
            self.stick_to_bottom = false;
            self.scroll_offset = self.scroll_offset.saturating_sub(delta.unsigned_abs() as u16);
        } else {
            self.scroll_offset = self.scroll_offset.saturating_add(delta as u16);
        }
        self.scroll_state = self.scroll_state.position(self.scroll_offset as usize);
    }
}

fn line_color(line: &str) -> Color {
    let theme = get_theme();
    if line.contains("[ERROR]") || line.starts_with("ERROR:") {
        theme.status_failed
    } else if line.contains("[WARN]") || line.contains('✗') {
        theme.status_warning
    } else if line.contains('✓') {
        theme.status_ok
    } else {
        theme.text_primary
    }
}

impl Component for LogsState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::LogMessage(msg) => self.add_log(msg.clone()),
            AppMsg::ErrorOccurred(err) => self.add_log(format!("ERROR: {}", err)),
            AppMsg::ExportFailed(err) => self.add_log(format!("ERROR: export failed: {}", err)),
            AppMsg::ExportCompleted { path, exported, skipped } => self.add_log(format!(
                "✓ Wrote {} cursors to {} ({} skipped)",
                exported,
                path.display(),
                skipped
            )),
            AppMsg::ConfigSaved(path) => self.add_log(format!("✓ Saved {}", path.display())),
            AppMsg::Key(key) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-10),
                KeyCode::PageDown => self.scroll_by(10),
                _ => {}
            },
            _ => {}
        }
        None
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let block = focused_block("Logs", is_focused);

        let inner_area = block.inner(area);
        block.render(area, buf);

        let width = (inner_area.width as usize).saturating_sub(2);
        if width == 0 {
            return;
        }

        // wrapped lines keep the color of the record they came from
        let mut wrapped_lines = Vec::new();
        for log in &self.logs {
            let color = line_color(log);
            for line in textwrap::wrap(log, width) {
                wrapped_lines.push(Line::from(Span::styled(line.into_owned(), Style::default().fg(color))));
            }
        }
        let total_height = wrapped_lines.len();

        let viewport_height = inner_area.height as usize;
        let max_scroll = total_height.saturating_sub(viewport_height);

        self.scroll_state = self.scroll_state.content_length(total_height);

        if self.stick_to_bottom || self.scroll_offset as usize >= max_scroll {
            self.scroll_offset = max_scroll as u16;
            self.stick_to_bottom = true;
        }

        Paragraph::new(wrapped_lines)
            .scroll((self.scroll_offset, 0))
            .render(inner_area, buf);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));

        StatefulWidget::render(scrollbar, inner_area, buf, &mut self.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels_colored() {
        let theme = get_theme();
        assert_eq!(line_color("[ERROR] boom"), theme.status_failed);
        assert_eq!(line_color("[WARN] skipped wait"), theme.status_warning);
        assert_eq!(line_color("[INFO] ready"), theme.text_primary);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut logs = LogsState::default();
        for i in 0..MAX_LOG_LINES + 5 {
            logs.add_log(i.to_string());
        }
        assert_eq!(logs.logs.len(), MAX_LOG_LINES);
        assert_eq!(logs.logs[0], "5");
    }

    #[test]
    fn test_export_messages_logged() {
        let mut logs = LogsState::default();
        logs.update(&AppMsg::ExportFailed("disk full".to_string()));
        assert_eq!(logs.logs, ["ERROR: export failed: disk full"]);
    }
}
