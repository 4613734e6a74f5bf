use serde::{Deserialize, Serialize};

use super::{ConfigFile, DebugOutput, HdpiMode};
use crate::error::{ConfigError, ConfigResult};
use crate::platform::{Environment, OperatingSystem, SystemEnvironment};
use crate::prefs::{self, FileType, PreferencesLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Maximum number of sources played at once.
    pub simultaneous_sources: u32,
    /// Device buffer size in samples.
    pub buffer_size: u32,
    pub buffer_count: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            simultaneous_sources: 16,
            buffer_size: 512,
            buffer_count: 9,
        }
    }
}

/// OpenGL ES 3 emulation. 3.2 is the highest context macOS offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlesConfig {
    pub use_gl30: bool,
    pub major_version: u32,
    pub minor_version: u32,
}

impl Default for GlesConfig {
    fn default() -> Self {
        Self {
            use_gl30: false,
            major_version: 3,
            minor_version: 2,
        }
    }
}

/// Bit depths of the color, depth and stencil buffers plus MSAA samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackBufferConfig {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    pub depth: u8,
    pub stencil: u8,
    pub samples: u8,
}

impl Default for BackBufferConfig {
    fn default() -> Self {
        Self {
            r: 8,
            g: 8,
            b: 8,
            a: 8,
            depth: 16,
            stencil: 0,
            samples: 0,
        }
    }
}

/// Launch configuration for the desktop backend.
///
/// Built once with OS dependent defaults, adjusted through the setters and
/// then handed to the application bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub initial_visible: bool,
    pub disable_audio: bool,
    pub max_net_threads: u32,
    pub transparent_framebuffer: bool,
    /// Polling rate while idle in non-continuous rendering.
    pub idle_fps: u32,
    /// Target frame rate; 0 never sleeps.
    pub foreground_fps: u32,
    /// Also look for preferences in the legacy `.prefs/` directory.
    pub allow_legacy_preferences: bool,
    pub hdpi_mode: HdpiMode,
    pub debug: bool,
    // tables last so the TOML output stays flat at the top
    pub debug_output: DebugOutput,
    pub audio: AudioConfig,
    pub gles: GlesConfig,
    pub back_buffer: BackBufferConfig,
    pub preferences: PreferencesLocation,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self::with_environment(OperatingSystem::current(), &SystemEnvironment)
    }
}

impl ConfigFile for ApplicationConfig {}

impl ApplicationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment<E: Environment + ?Sized>(os: OperatingSystem, env: &E) -> Self {
        Self {
            initial_visible: true,
            disable_audio: false,
            max_net_threads: u32::MAX,
            transparent_framebuffer: false,
            idle_fps: 60,
            foreground_fps: 0,
            allow_legacy_preferences: true,
            hdpi_mode: HdpiMode::Logical,
            debug: false,
            debug_output: DebugOutput::Stderr,
            audio: AudioConfig::default(),
            gles: GlesConfig::default(),
            back_buffer: BackBufferConfig::default(),
            preferences: prefs::default_location(os, env),
        }
    }

    pub fn copy_from(&mut self, other: &ApplicationConfig) {
        self.clone_from(other);
    }

    pub fn set_initial_visible(&mut self, visible: bool) {
        self.initial_visible = visible;
    }

    /// With audio disabled the backend hands out silent stand-ins.
    pub fn disable_audio(&mut self, disable: bool) {
        self.disable_audio = disable;
    }

    pub fn set_max_net_threads(&mut self, threads: u32) {
        self.max_net_threads = threads;
    }

    pub fn set_audio_config(&mut self, simultaneous_sources: u32, buffer_size: u32, buffer_count: u32) {
        self.audio = AudioConfig {
            simultaneous_sources,
            buffer_size,
            buffer_count,
        };
    }

    /// Unsupported versions fall back to GLES 2 emulation at context creation.
    pub fn use_opengl3(&mut self, enabled: bool, major_version: u32, minor_version: u32) {
        self.gles = GlesConfig {
            use_gl30: enabled,
            major_version,
            minor_version,
        };
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_back_buffer_config(&mut self, r: u8, g: u8, b: u8, a: u8, depth: u8, stencil: u8, samples: u8) {
        self.back_buffer = BackBufferConfig {
            r,
            g,
            b,
            a,
            depth,
            stencil,
            samples,
        };
    }

    /// Results vary across OSes and GPUs.
    pub fn set_transparent_framebuffer(&mut self, transparent: bool) {
        self.transparent_framebuffer = transparent;
    }

    pub fn set_idle_fps(&mut self, fps: u32) {
        self.idle_fps = fps;
    }

    pub fn set_foreground_fps(&mut self, fps: u32) {
        self.foreground_fps = fps;
    }

    pub fn set_preferences_config(&mut self, directory: impl Into<String>, file_type: FileType) {
        self.preferences = PreferencesLocation::new(directory, file_type);
    }

    pub fn set_preferences_config_with_legacy(
        &mut self,
        directory: impl Into<String>,
        file_type: FileType,
        allow_legacy: bool,
    ) {
        self.set_preferences_config(directory, file_type);
        self.allow_legacy_preferences = allow_legacy;
    }

    pub fn set_allow_legacy_preferences(&mut self, allow_legacy: bool) {
        self.allow_legacy_preferences = allow_legacy;
    }

    pub fn set_hdpi_mode(&mut self, mode: HdpiMode) {
        self.hdpi_mode = mode;
    }

    pub fn enable_gl_debug_output(&mut self, enable: bool, output: DebugOutput) {
        self.debug = enable;
        self.debug_output = output;
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.disable_audio {
            if self.audio.buffer_size == 0 {
                return Err(ConfigError::Invalid(
                    "audio buffer size must be greater than zero".to_string(),
                ));
            }
            if self.audio.buffer_count == 0 {
                return Err(ConfigError::Invalid(
                    "audio buffer count must be greater than zero".to_string(),
                ));
            }
        }

        if self.gles.use_gl30 && !(2..=4).contains(&self.gles.major_version) {
            return Err(ConfigError::Invalid(format!(
                "GLES major version {} is not supported",
                self.gles.major_version
            )));
        }

        let samples = self.back_buffer.samples;
        if samples != 0 && !samples.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "MSAA sample count {} is not a power of two",
                samples
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MapEnvironment;
    use tempfile::tempdir;

    fn linux_config() -> ApplicationConfig {
        let env = MapEnvironment::new().with("HOME", "/home/u");
        ApplicationConfig::with_environment(OperatingSystem::Linux, &env)
    }

    #[test]
    fn test_defaults() {
        let config = linux_config();
        assert!(config.initial_visible);
        assert_eq!(config.max_net_threads, u32::MAX);
        assert_eq!(config.audio, AudioConfig { simultaneous_sources: 16, buffer_size: 512, buffer_count: 9 });
        assert_eq!((config.gles.major_version, config.gles.minor_version), (3, 2));
        assert_eq!(config.back_buffer.depth, 16);
        assert_eq!(config.idle_fps, 60);
        assert_eq!(config.foreground_fps, 0);
        assert_eq!(config.preferences, PreferencesLocation::new(".config", FileType::External));
        assert!(config.allow_legacy_preferences);
        assert_eq!(config.hdpi_mode, HdpiMode::Logical);
        assert_eq!(config.debug_output, DebugOutput::Stderr);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_windows_preferences_default() {
        let env = MapEnvironment::new().with("APPDATA", "C:/Users/u/AppData/Roaming");
        let config = ApplicationConfig::with_environment(OperatingSystem::Windows, &env);
        assert_eq!(config.preferences.directory, "C:/Users/u/AppData/Roaming");
        assert_eq!(config.preferences.file_type, FileType::Absolute);
    }

    #[test]
    fn test_setters() {
        let mut config = linux_config();
        config.set_audio_config(8, 1024, 4);
        config.use_opengl3(true, 4, 3);
        config.set_back_buffer_config(5, 6, 5, 0, 24, 8, 4);
        config.set_foreground_fps(144);
        config.set_preferences_config_with_legacy("saves", FileType::Local, false);
        config.set_hdpi_mode(HdpiMode::Pixels);
        config.enable_gl_debug_output(true, DebugOutput::Stdout);

        assert_eq!(config.audio.buffer_size, 1024);
        assert!(config.gles.use_gl30);
        assert_eq!(config.back_buffer.stencil, 8);
        assert_eq!(config.foreground_fps, 144);
        assert_eq!(config.preferences, PreferencesLocation::new("saves", FileType::Local));
        assert!(!config.allow_legacy_preferences);
        assert_eq!(config.hdpi_mode, HdpiMode::Pixels);
        assert!(config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_copy_from() {
        let mut source = linux_config();
        source.set_idle_fps(10);
        source.disable_audio(true);

        let mut target = linux_config();
        target.copy_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = linux_config();
        config.set_audio_config(16, 0, 9);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        // irrelevant once audio is off
        config.disable_audio(true);
        assert!(config.validate().is_ok());

        let mut config = linux_config();
        config.use_opengl3(true, 5, 0);
        assert!(config.validate().is_err());

        let mut config = linux_config();
        config.set_back_buffer_config(8, 8, 8, 8, 16, 0, 3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = linux_config();
        config.enable_gl_debug_output(true, DebugOutput::File("gl.log".into()));
        config.set_preferences_config("/srv/prefs", FileType::Absolute);
        config.save_to_file(&path).unwrap();

        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ApplicationConfig::from_toml_str(
            "foreground_fps = 30\n\
             hdpi_mode = \"pixels\"\n\
             [audio]\n\
             buffer_size = 256\n\
             [preferences]\n\
             directory = \"prefs\"\n\
             file_type = \"Local\"\n",
        )
        .unwrap();

        assert_eq!(config.foreground_fps, 30);
        assert_eq!(config.hdpi_mode, HdpiMode::Pixels);
        assert_eq!(config.audio.buffer_size, 256);
        assert_eq!(config.audio.buffer_count, 9);
        assert_eq!(config.idle_fps, 60);
        assert_eq!(config.preferences, PreferencesLocation::new("prefs", FileType::Local));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ApplicationConfig::from_toml_str("idle_fps = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
