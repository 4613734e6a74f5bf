use anyhow::Result;
use backendcfg::config::{ApplicationConfig, ConfigFile};
use crossbeam_channel::{Receiver, Sender, unbounded};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use ratatui_image::picker::Picker;
use std::{io, time::Duration};

use crate::components::Component;
use crate::components::config_editor::ConfigEditorState;
use crate::components::cursor_lab::CursorLabState;
use crate::components::file_browser::FileBrowserState;
use crate::components::logs::LogsState;
use crate::components::prefs_view::PrefsViewState;
use crate::event::AppMsg;
use crate::export_worker::ExportWorker;
use crate::session::Session;
use crate::widgets::theme::get_theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FileBrowser,
    ConfigEditor,
    PrefsView,
    CursorLab,
    Logs,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::FileBrowser,
        Focus::ConfigEditor,
        Focus::PrefsView,
        Focus::CursorLab,
        Focus::Logs,
    ];

    pub fn next(self) -> Self {
        let ix = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(ix + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let ix = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(ix + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct App {
    pub session: Session,
    pub focus: Focus,
    pub file_browser: FileBrowserState,
    pub config_editor: ConfigEditorState,
    pub prefs_view: PrefsViewState,
    pub cursor_lab: CursorLabState,
    pub logs: LogsState,
    worker: ExportWorker,
    worker_rx: Receiver<AppMsg>,
    log_rx: Receiver<String>,
    exporting: bool,
}

impl App {
    pub fn new(session: Session, picker: Option<Picker>, log_rx: Receiver<String>) -> Self {
        let (worker_tx, worker_rx): (Sender<AppMsg>, Receiver<AppMsg>) = unbounded();
        let config = load_config(&session);
        let home = session.home_dir();

        Self {
            focus: Focus::FileBrowser,
            file_browser: FileBrowserState::new(session.browse_root.clone()),
            prefs_view: PrefsViewState::new(config.preferences.clone(), home),
            config_editor: ConfigEditorState::new(config, session.config_path.clone()),
            cursor_lab: CursorLabState::new(picker),
            logs: LogsState::default(),
            worker: ExportWorker::new(worker_tx),
            worker_rx,
            log_rx,
            exporting: false,
            session,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        let res = self.event_loop(&mut terminal);

        // Restore terminal
        restore_terminal(&mut terminal)?;
        res
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick_rate = Duration::from_millis(200);
        self.cursor_lab.rebuild();

        loop {
            terminal.draw(|f| {
                let area = f.area();
                self.render(area, f.buffer_mut());
            })?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                    && self.handle_key(key)
                {
                    break;
                }
            } else {
                self.dispatch(AppMsg::Tick);
            }

            while let Ok(line) = self.log_rx.try_recv() {
                self.logs.add_log(line);
            }
            while let Ok(msg) = self.worker_rx.try_recv() {
                self.dispatch(msg);
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => return true,
            (KeyCode::Tab, _) => self.focus = self.focus.next(),
            (KeyCode::BackTab, _) => self.focus = self.focus.prev(),
            _ => {
                let msg = AppMsg::Key(key);
                let reply = match self.focus {
                    Focus::FileBrowser => self.file_browser.update(&msg),
                    Focus::ConfigEditor => self.config_editor.update(&msg),
                    Focus::PrefsView => self.prefs_view.update(&msg),
                    Focus::CursorLab => self.cursor_lab.update(&msg),
                    Focus::Logs => self.logs.update(&msg),
                };
                if let Some(reply) = reply {
                    self.dispatch(reply);
                }
            }
        }
        false
    }

    /// Routes an application message; follow-up messages are routed in turn.
    fn dispatch(&mut self, msg: AppMsg) {
        let mut pending = vec![msg];
        while let Some(msg) = pending.pop() {
            match &msg {
                AppMsg::Tick => {
                    self.file_browser.update(&msg);
                }
                AppMsg::PathSelected(_) => {
                    pending.extend(self.cursor_lab.update(&msg));
                }
                AppMsg::PreferencesChanged(_) => {
                    self.prefs_view.update(&msg);
                }
                AppMsg::ExportRequested(dir) => {
                    if self.exporting {
                        warn!("An export is already running");
                    } else {
                        self.exporting = true;
                        info!(
                            "Exporting {} to {}",
                            dir.display(),
                            self.session.stylesheet_path.display()
                        );
                        self.worker.start_export(
                            dir.clone(),
                            self.session.stylesheet_path.clone(),
                            self.cursor_lab.profile(),
                        );
                    }
                }
                AppMsg::ExportCompleted { .. } | AppMsg::ExportFailed(_) => {
                    self.exporting = false;
                    self.logs.update(&msg);
                }
                AppMsg::ConfigSaved(_) | AppMsg::ErrorOccurred(_) | AppMsg::LogMessage(_) => {
                    self.logs.update(&msg);
                }
                AppMsg::Key(_) => {}
            }
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let theme = get_theme();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Percentage(45),
                Constraint::Min(8),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new("backendcfg")
            .style(Style::default().fg(theme.text_highlight))
            .alignment(Alignment::Center)
            .render(rows[0], buf);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(35),
                Constraint::Percentage(35),
            ])
            .split(rows[1]);

        self.file_browser.render(top[0], buf, self.focus == Focus::FileBrowser);
        self.config_editor.render(top[1], buf, self.focus == Focus::ConfigEditor);
        self.prefs_view.render(top[2], buf, self.focus == Focus::PrefsView);
        self.cursor_lab.render(rows[2], buf, self.focus == Focus::CursorLab);
        self.logs.render(rows[3], buf, self.focus == Focus::Logs);

        let status = if self.exporting {
            "Exporting...".to_string()
        } else {
            format!(
                "Tab focus  l load  e export  q quit  |  stylesheet: {}",
                self.session.stylesheet_path.display()
            )
        };
        Paragraph::new(status)
            .style(Style::default().fg(theme.text_secondary))
            .render(rows[4], buf);
    }
}

/// Reads the saved config, or starts from the detected defaults.
fn load_config(session: &Session) -> ApplicationConfig {
    if !session.config_path.exists() {
        info!("No config at {}, using defaults", session.config_path.display());
        return ApplicationConfig::new();
    }
    match ApplicationConfig::load_from_file(&session.config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Failed to load {}: {}, using defaults",
                session.config_path.display(),
                e
            );
            ApplicationConfig::new()
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().ok();
    // LeaveAlternateScreen must be executed on the same stdout the backend uses
    let mut out = io::stdout();
    execute!(out, LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn app_in(dir: &std::path::Path) -> App {
        let session = Session {
            config_path: dir.join("config.toml"),
            browse_root: dir.to_path_buf(),
            stylesheet_path: dir.join("out/cursors.css"),
        };
        let (_tx, rx) = unbounded();
        App::new(session, None, rx)
    }

    #[test]
    fn test_focus_cycles() {
        let mut focus = Focus::FileBrowser;
        for _ in 0..Focus::ORDER.len() {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::FileBrowser);
        assert_eq!(Focus::FileBrowser.prev(), Focus::Logs);
    }

    #[test]
    fn test_quit_keys() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert!(!app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)));
        assert_eq!(app.focus, Focus::ConfigEditor);
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "idle_fps = \"fast\"").unwrap();
        let app = app_in(dir.path());
        assert_eq!(app.config_editor.config.idle_fps, 60);
    }

    #[test]
    fn test_editor_changes_reach_prefs_view() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        let location = backendcfg::prefs::PreferencesLocation::new("/srv/prefs", backendcfg::prefs::FileType::Absolute);
        app.dispatch(AppMsg::PreferencesChanged(location.clone()));
        assert_eq!(app.prefs_view.active, location);
    }
}
