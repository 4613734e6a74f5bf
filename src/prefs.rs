//! Default preferences location per operating system.
//!
//! Windows stores preferences under `%APPDATA%`, macOS under
//! `~/Library/Preferences` and Linux under `$XDG_CONFIG_HOME` or `~/.config`.
//! Anything unresolvable falls back to a directory relative to the user's home.

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::platform::{Environment, OperatingSystem, SystemEnvironment};

/// Used before preferences moved to the OS conventional locations.
pub const LEGACY_PREFERENCES_DIR: &str = ".prefs/";
pub const MAC_PREFERENCES_DIR: &str = "Library/Preferences";
pub const XDG_FALLBACK_DIR: &str = ".config";

/// Storage class of a path, mirroring the framework's file handle types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FileType {
    Classpath,
    Internal,
    /// Relative to the user's home directory.
    #[default]
    External,
    /// A full filesystem path.
    Absolute,
    Local,
}

impl FileType {
    pub const ALL: [FileType; 5] = [
        FileType::Classpath,
        FileType::Internal,
        FileType::External,
        FileType::Absolute,
        FileType::Local,
    ];

    /// Turns a stored path into a filesystem path.
    pub fn resolve(self, path: &str, home: &Path) -> PathBuf {
        match self {
            FileType::External => home.join(path),
            FileType::Absolute => PathBuf::from(path),
            FileType::Classpath | FileType::Internal | FileType::Local => PathBuf::from(path),
        }
    }

    pub fn next(self) -> Self {
        let ix = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(ix + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Classpath => "Classpath",
            FileType::Internal => "Internal",
            FileType::External => "External",
            FileType::Absolute => "Absolute",
            FileType::Local => "Local",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesLocation {
    pub directory: String,
    pub file_type: FileType,
}

impl PreferencesLocation {
    pub fn new(directory: impl Into<String>, file_type: FileType) -> Self {
        Self {
            directory: directory.into(),
            file_type,
        }
    }

    pub fn legacy() -> Self {
        Self::new(LEGACY_PREFERENCES_DIR, FileType::External)
    }

    /// Default location for the running OS, read from the process environment.
    pub fn detect() -> Self {
        default_location(OperatingSystem::current(), &SystemEnvironment)
    }

    pub fn resolve_path(&self, home: &Path) -> PathBuf {
        self.file_type.resolve(&self.directory, home)
    }
}

impl Default for PreferencesLocation {
    fn default() -> Self {
        Self::detect()
    }
}

/// Resolves the default preferences location, falling back to [`PreferencesLocation::legacy`].
pub fn default_location<E: Environment + ?Sized>(os: OperatingSystem, env: &E) -> PreferencesLocation {
    default_location_with_fallback(os, env, &PreferencesLocation::legacy())
}

pub fn default_location_with_fallback<E: Environment + ?Sized>(
    os: OperatingSystem,
    env: &E,
    fallback: &PreferencesLocation,
) -> PreferencesLocation {
    match os {
        OperatingSystem::Windows => {
            // APPDATA exists from 2000 onward, WINDIR covers 95/98/Me
            if let Some(appdata) = env.non_empty_var("APPDATA") {
                PreferencesLocation::new(appdata, FileType::Absolute)
            } else if let Some(windir) = env.non_empty_var("WINDIR") {
                PreferencesLocation::new(format!("{}/Application Data", windir), FileType::Absolute)
            } else {
                debug!(
                    "Neither APPDATA nor WINDIR is set, using {}",
                    fallback.directory
                );
                fallback.clone()
            }
        }
        OperatingSystem::Mac => PreferencesLocation::new(MAC_PREFERENCES_DIR, FileType::External),
        OperatingSystem::Linux => match xdg_config_home(env) {
            Some(dir) => PreferencesLocation::new(dir, FileType::Absolute),
            None => PreferencesLocation::new(XDG_FALLBACK_DIR, FileType::External),
        },
        OperatingSystem::Unknown => fallback.clone(),
    }
}

pub fn default_directory<E: Environment + ?Sized>(os: OperatingSystem, env: &E) -> String {
    default_location(os, env).directory
}

pub fn default_file_type<E: Environment + ?Sized>(os: OperatingSystem, env: &E) -> FileType {
    default_location(os, env).file_type
}

fn xdg_config_home<E: Environment + ?Sized>(env: &E) -> Option<String> {
    let raw = env.non_empty_var("XDG_CONFIG_HOME")?;
    match expand_env_refs(&raw, env) {
        Some(expanded) if !expanded.is_empty() => Some(expanded),
        Some(_) => {
            debug!("XDG_CONFIG_HOME {:?} expands to an empty path, ignoring it", raw);
            None
        }
        None => {
            debug!("XDG_CONFIG_HOME {:?} has unresolvable references, ignoring it", raw);
            None
        }
    }
}

// group 1: escaping backslash, group 2: ${NAME}, group 3: $NAME
static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\)?\$(?:\{([A-Za-z0-9_]+)\}|([A-Za-z0-9_]+))?").expect("env reference pattern is valid")
});

/// Expands `$NAME` and `${NAME}` references in a single pass.
///
/// `\$` stays a literal dollar. Returns `None` when a reference names an unset
/// variable or a `$` is not followed by a name.
pub fn expand_env_refs<E: Environment + ?Sized>(value: &str, env: &E) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;

    for caps in ENV_REF.captures_iter(value) {
        let whole = caps.get(0)?;
        out.push_str(&value[last..whole.start()]);
        last = whole.end();

        if caps.get(1).is_some() {
            out.push_str(&whole.as_str()[1..]);
            continue;
        }

        let name = caps.get(2).or_else(|| caps.get(3))?.as_str();
        out.push_str(&env.var(name)?);
    }

    out.push_str(&value[last..]);
    Some(out)
}
