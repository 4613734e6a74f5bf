use super::Component;
use crate::event::AppMsg;
use crate::widgets::common::focused_block;
use crate::widgets::theme::get_theme;
use backendcfg::config::{ApplicationConfig, BackBufferConfig, ConfigFile, DebugOutput};
use backendcfg::prefs::PreferencesLocation;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    InitialVisible,
    DisableAudio,
    MaxNetThreads,
    AudioSources,
    AudioBufferSize,
    AudioBufferCount,
    UseGl30,
    GlesMajor,
    GlesMinor,
    Red,
    Green,
    Blue,
    Alpha,
    Depth,
    Stencil,
    Samples,
    TransparentFramebuffer,
    IdleFps,
    ForegroundFps,
    PreferencesFileType,
    AllowLegacyPreferences,
    HdpiMode,
    Debug,
    DebugOutput,
}

impl Field {
    pub const ALL: [Field; 24] = [
        Field::InitialVisible,
        Field::DisableAudio,
        Field::MaxNetThreads,
        Field::AudioSources,
        Field::AudioBufferSize,
        Field::AudioBufferCount,
        Field::UseGl30,
        Field::GlesMajor,
        Field::GlesMinor,
        Field::Red,
        Field::Green,
        Field::Blue,
        Field::Alpha,
        Field::Depth,
        Field::Stencil,
        Field::Samples,
        Field::TransparentFramebuffer,
        Field::IdleFps,
        Field::ForegroundFps,
        Field::PreferencesFileType,
        Field::AllowLegacyPreferences,
        Field::HdpiMode,
        Field::Debug,
        Field::DebugOutput,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::InitialVisible => "Initially visible",
            Field::DisableAudio => "Disable audio",
            Field::MaxNetThreads => "Max net threads",
            Field::AudioSources => "Audio sources",
            Field::AudioBufferSize => "Audio buffer size",
            Field::AudioBufferCount => "Audio buffer count",
            Field::UseGl30 => "GLES 3 emulation",
            Field::GlesMajor => "GLES major",
            Field::GlesMinor => "GLES minor",
            Field::Red => "Red bits",
            Field::Green => "Green bits",
            Field::Blue => "Blue bits",
            Field::Alpha => "Alpha bits",
            Field::Depth => "Depth bits",
            Field::Stencil => "Stencil bits",
            Field::Samples => "MSAA samples",
            Field::TransparentFramebuffer => "Transparent framebuffer",
            Field::IdleFps => "Idle FPS",
            Field::ForegroundFps => "Foreground FPS",
            Field::PreferencesFileType => "Preferences file type",
            Field::AllowLegacyPreferences => "Legacy .prefs lookup",
            Field::HdpiMode => "HDPI mode",
            Field::Debug => "GL debug output",
            Field::DebugOutput => "Debug stream",
        }
    }

    pub fn value(self, config: &ApplicationConfig) -> String {
        let bb = &config.back_buffer;
        match self {
            Field::InitialVisible => on_off(config.initial_visible),
            Field::DisableAudio => on_off(config.disable_audio),
            Field::MaxNetThreads => {
                if config.max_net_threads == u32::MAX {
                    "unlimited".to_string()
                } else {
                    config.max_net_threads.to_string()
                }
            }
            Field::AudioSources => config.audio.simultaneous_sources.to_string(),
            Field::AudioBufferSize => config.audio.buffer_size.to_string(),
            Field::AudioBufferCount => config.audio.buffer_count.to_string(),
            Field::UseGl30 => on_off(config.gles.use_gl30),
            Field::GlesMajor => config.gles.major_version.to_string(),
            Field::GlesMinor => config.gles.minor_version.to_string(),
            Field::Red => bb.r.to_string(),
            Field::Green => bb.g.to_string(),
            Field::Blue => bb.b.to_string(),
            Field::Alpha => bb.a.to_string(),
            Field::Depth => bb.depth.to_string(),
            Field::Stencil => bb.stencil.to_string(),
            Field::Samples => bb.samples.to_string(),
            Field::TransparentFramebuffer => on_off(config.transparent_framebuffer),
            Field::IdleFps => config.idle_fps.to_string(),
            Field::ForegroundFps => {
                if config.foreground_fps == 0 {
                    "0 (never sleep)".to_string()
                } else {
                    config.foreground_fps.to_string()
                }
            }
            Field::PreferencesFileType => config.preferences.file_type.to_string(),
            Field::AllowLegacyPreferences => on_off(config.allow_legacy_preferences),
            Field::HdpiMode => format!("{:?}", config.hdpi_mode),
            Field::Debug => on_off(config.debug),
            Field::DebugOutput => config.debug_output.label(),
        }
    }

    /// Steps a numeric field by `delta`; toggles or cycles everything else.
    pub fn adjust(self, config: &mut ApplicationConfig, delta: i64) {
        let audio = config.audio;
        let gles = config.gles;
        match self {
            Field::MaxNetThreads => {
                let threads = step_u32(config.max_net_threads, delta);
                config.set_max_net_threads(threads);
            }
            Field::AudioSources => config.set_audio_config(
                step_u32(audio.simultaneous_sources, delta),
                audio.buffer_size,
                audio.buffer_count,
            ),
            Field::AudioBufferSize => config.set_audio_config(
                audio.simultaneous_sources,
                step_u32(audio.buffer_size, delta),
                audio.buffer_count,
            ),
            Field::AudioBufferCount => config.set_audio_config(
                audio.simultaneous_sources,
                audio.buffer_size,
                step_u32(audio.buffer_count, delta),
            ),
            Field::GlesMajor => config.use_opengl3(
                gles.use_gl30,
                step_u32(gles.major_version, delta),
                gles.minor_version,
            ),
            Field::GlesMinor => config.use_opengl3(
                gles.use_gl30,
                gles.major_version,
                step_u32(gles.minor_version, delta),
            ),
            Field::Red => with_back_buffer(config, |bb| bb.r = step_u8(bb.r, delta)),
            Field::Green => with_back_buffer(config, |bb| bb.g = step_u8(bb.g, delta)),
            Field::Blue => with_back_buffer(config, |bb| bb.b = step_u8(bb.b, delta)),
            Field::Alpha => with_back_buffer(config, |bb| bb.a = step_u8(bb.a, delta)),
            Field::Depth => with_back_buffer(config, |bb| bb.depth = step_u8(bb.depth, delta)),
            Field::Stencil => with_back_buffer(config, |bb| bb.stencil = step_u8(bb.stencil, delta)),
            Field::Samples => with_back_buffer(config, |bb| bb.samples = step_u8(bb.samples, delta)),
            Field::IdleFps => {
                let fps = step_u32(config.idle_fps, delta);
                config.set_idle_fps(fps);
            }
            Field::ForegroundFps => {
                let fps = step_u32(config.foreground_fps, delta);
                config.set_foreground_fps(fps);
            }
            _ => self.activate(config),
        }
    }

    pub fn activate(self, config: &mut ApplicationConfig) {
        match self {
            Field::InitialVisible => {
                let visible = !config.initial_visible;
                config.set_initial_visible(visible);
            }
            Field::DisableAudio => {
                let disable = !config.disable_audio;
                config.disable_audio(disable);
            }
            Field::UseGl30 => {
                let gles = config.gles;
                config.use_opengl3(!gles.use_gl30, gles.major_version, gles.minor_version);
            }
            Field::TransparentFramebuffer => {
                let transparent = !config.transparent_framebuffer;
                config.set_transparent_framebuffer(transparent);
            }
            Field::PreferencesFileType => {
                let dir = config.preferences.directory.clone();
                let file_type = config.preferences.file_type.next();
                config.set_preferences_config(dir, file_type);
            }
            Field::AllowLegacyPreferences => {
                let allow = !config.allow_legacy_preferences;
                config.set_allow_legacy_preferences(allow);
            }
            Field::HdpiMode => {
                let mode = config.hdpi_mode.toggled();
                config.set_hdpi_mode(mode);
            }
            Field::Debug => {
                let output = config.debug_output.clone();
                config.enable_gl_debug_output(!config.debug, output);
            }
            Field::DebugOutput => {
                let output = match config.debug_output {
                    DebugOutput::Stderr => DebugOutput::Stdout,
                    DebugOutput::Stdout | DebugOutput::File(_) => DebugOutput::Stderr,
                };
                config.enable_gl_debug_output(config.debug, output);
            }
            // numeric fields have nothing to toggle
            _ => {}
        }
    }
}

fn on_off(value: bool) -> String {
    let text = if value { "on" } else { "off" };
    text.to_string()
}

fn step_u32(value: u32, delta: i64) -> u32 {
    (value as i64 + delta).clamp(0, u32::MAX as i64) as u32
}

fn step_u8(value: u8, delta: i64) -> u8 {
    (value as i64 + delta).clamp(0, u8::MAX as i64) as u8
}

fn with_back_buffer<F: FnOnce(&mut BackBufferConfig)>(config: &mut ApplicationConfig, f: F) {
    let mut bb = config.back_buffer;
    f(&mut bb);
    config.set_back_buffer_config(bb.r, bb.g, bb.b, bb.a, bb.depth, bb.stencil, bb.samples);
}

pub struct ConfigEditorState {
    pub config: ApplicationConfig,
    pub config_path: PathBuf,
    pub selected_index: usize,
    pub list_state: ListState,
    pub dirty: bool,
}

impl ConfigEditorState {
    pub fn new(config: ApplicationConfig, config_path: PathBuf) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            config,
            config_path,
            selected_index: 0,
            list_state,
            dirty: false,
        }
    }

    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected_index]
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index;
        self.list_state.select(Some(index));
    }

    fn changed(&mut self, field: Field) -> Option<AppMsg> {
        self.dirty = true;
        if field == Field::PreferencesFileType {
            Some(AppMsg::PreferencesChanged(self.config.preferences.clone()))
        } else {
            None
        }
    }

    pub fn save(&mut self) -> AppMsg {
        if let Err(e) = self.config.validate() {
            return AppMsg::ErrorOccurred(e.to_string());
        }
        if self.config.debug
            && let Err(e) = self.config.debug_output.open()
        {
            return AppMsg::ErrorOccurred(format!(
                "Cannot open debug output {}: {}",
                self.config.debug_output.label(),
                e
            ));
        }
        match self.config.save_to_file(&self.config_path) {
            Ok(()) => {
                self.dirty = false;
                AppMsg::ConfigSaved(self.config_path.clone())
            }
            Err(e) => AppMsg::ErrorOccurred(format!("Failed to save config: {}", e)),
        }
    }

    pub fn reload(&mut self) -> AppMsg {
        match ApplicationConfig::load_from_file(&self.config_path) {
            Ok(config) => {
                self.config = config;
                self.dirty = false;
                AppMsg::PreferencesChanged(self.config.preferences.clone())
            }
            Err(e) => AppMsg::ErrorOccurred(format!(
                "Failed to load {}: {}",
                self.config_path.display(),
                e
            )),
        }
    }

    pub fn reset_preferences(&mut self) -> AppMsg {
        let detected = PreferencesLocation::detect();
        self.config
            .set_preferences_config(detected.directory.clone(), detected.file_type);
        self.dirty = true;
        AppMsg::PreferencesChanged(detected)
    }
}

impl Component for ConfigEditorState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        let AppMsg::Key(key) = msg else {
            return None;
        };

        let field = self.selected_field();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let index = if self.selected_index == 0 {
                    Field::ALL.len() - 1
                } else {
                    self.selected_index - 1
                };
                self.select(index);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select((self.selected_index + 1) % Field::ALL.len());
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                field.adjust(&mut self.config, -1);
                self.changed(field)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                field.adjust(&mut self.config, 1);
                self.changed(field)
            }
            KeyCode::Char('-') => {
                field.adjust(&mut self.config, -10);
                self.changed(field)
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                field.adjust(&mut self.config, 10);
                self.changed(field)
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                field.activate(&mut self.config);
                self.changed(field)
            }
            KeyCode::Char('s') => Some(self.save()),
            KeyCode::Char('r') => Some(self.reload()),
            KeyCode::Char('d') => Some(self.reset_preferences()),
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();
        let title = if self.dirty { "Config *" } else { "Config" };
        let block = focused_block(title, is_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|field| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<24}", field.label()),
                        Style::default().fg(theme.text_secondary),
                    ),
                    Span::styled(field.value(&self.config), Style::default().fg(theme.text_primary)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(theme.text_highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");
        StatefulWidget::render(list, chunks[0], buf, &mut self.list_state);

        let status = match self.config.validate() {
            Ok(()) => Line::from(Span::styled("valid", Style::default().fg(theme.status_ok))),
            Err(e) => Line::from(Span::styled(e.to_string(), Style::default().fg(theme.status_failed))),
        };
        let hints = Line::from(Span::styled(
            "←/→ adjust  +/- ×10  enter toggle  s save  r reload  d detect prefs",
            Style::default().fg(theme.text_secondary),
        ));
        Paragraph::new(vec![status, hints]).render(chunks[1], buf);
    }
}
