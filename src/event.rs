use backendcfg::prefs::PreferencesLocation;
use crossterm::event::KeyEvent;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub enum AppMsg {
    Tick,
    Key(KeyEvent),

    // File browser selection (a PNG or a cursor folder)
    PathSelected(PathBuf),

    // Config editor
    ConfigSaved(PathBuf),
    PreferencesChanged(PreferencesLocation),

    // Stylesheet export
    ExportRequested(PathBuf),
    ExportCompleted {
        path: PathBuf,
        exported: usize,
        skipped: usize,
    },
    ExportFailed(String),

    // General
    ErrorOccurred(String),
    LogMessage(String),
}
