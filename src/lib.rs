// Library exports for backendcfg

pub mod config;
pub mod cursor;
pub mod error;
pub mod logging;
pub mod platform;
pub mod prefs;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{ApplicationConfig, ConfigFile, HeadlessConfig};
pub use cursor::{BrowserCursor, BrowserProfile, Cursor, PixelFormat, Pixmap, SystemCursor};
pub use error::{ConfigError, CursorError};
pub use platform::{Environment, MapEnvironment, OperatingSystem, SystemEnvironment};
pub use prefs::{FileType, PreferencesLocation};
