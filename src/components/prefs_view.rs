use super::Component;
use crate::event::AppMsg;
use crate::widgets::common::{field_line, focused_block};
use crate::widgets::theme::get_theme;
use backendcfg::platform::{Environment, MapEnvironment, OperatingSystem, SystemEnvironment};
use backendcfg::prefs::{self, PreferencesLocation};
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use std::path::PathBuf;

/// Variables the preferences resolution reads.
pub const WATCHED_VARS: [&str; 4] = ["APPDATA", "WINDIR", "XDG_CONFIG_HOME", "HOME"];

/// Shows how the preferences location is derived on every OS from the
/// current environment.
pub struct PrefsViewState {
    pub os: OperatingSystem,
    pub env: MapEnvironment,
    pub home: PathBuf,
    /// Location the config editor currently holds.
    pub active: PreferencesLocation,
}

impl PrefsViewState {
    pub fn new(active: PreferencesLocation, home: PathBuf) -> Self {
        Self {
            os: OperatingSystem::current(),
            env: MapEnvironment::capture(&SystemEnvironment, &WATCHED_VARS),
            home,
            active,
        }
    }

    pub fn refresh(&mut self) {
        self.env = MapEnvironment::capture(&SystemEnvironment, &WATCHED_VARS);
    }

    /// Default location per OS against the captured environment.
    pub fn resolutions(&self) -> Vec<(OperatingSystem, PreferencesLocation)> {
        OperatingSystem::ALL
            .iter()
            .map(|os| (*os, prefs::default_location(*os, &self.env)))
            .collect()
    }
}

impl Component for PrefsViewState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::PreferencesChanged(location) => {
                self.active = location.clone();
                None
            }
            AppMsg::Key(key) if key.code == KeyCode::Char('r') => {
                self.refresh();
                Some(AppMsg::LogMessage("Environment snapshot refreshed".to_string()))
            }
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();
        let block = focused_block("Preferences", is_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default().fg(theme.text_highlight).add_modifier(Modifier::BOLD),
            ))
        };

        let mut lines = vec![field_line("Running on", self.os.label()), Line::default(), heading("Environment")];
        for var in WATCHED_VARS {
            let value = self.env.var(var).unwrap_or_else(|| "<unset>".to_string());
            lines.push(field_line(var, value));
        }

        lines.push(Line::default());
        lines.push(heading("Defaults"));
        for (os, location) in self.resolutions() {
            let marker = if os == self.os { "*" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!("{} {:<8}", marker, os.label()), Style::default().fg(theme.label)),
                Span::styled(
                    format!("{} ({})", location.directory, location.file_type),
                    Style::default().fg(theme.text_primary),
                ),
            ]));
        }

        lines.push(Line::default());
        lines.push(heading("Active"));
        lines.push(field_line("Directory", self.active.directory.clone()));
        lines.push(field_line("File type", self.active.file_type.to_string()));
        lines.push(field_line(
            "Resolves to",
            self.active.resolve_path(&self.home).display().to_string(),
        ));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
