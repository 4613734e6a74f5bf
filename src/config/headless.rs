use serde::{Deserialize, Serialize};

use super::ConfigFile;
use crate::platform::{Environment, OperatingSystem, SystemEnvironment};
use crate::prefs::{self, FileType, LEGACY_PREFERENCES_DIR, PreferencesLocation};

/// How often the headless loop updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRate {
    /// Update as fast as possible, never sleep.
    Unthrottled,
    PerSecond(u32),
    /// Never call render.
    Disabled,
}

impl UpdateRate {
    /// Maps the integer convention: 0 never sleeps, negative never renders.
    pub fn from_updates_per_second(updates: i32) -> Self {
        match updates {
            0 => UpdateRate::Unthrottled,
            n if n < 0 => UpdateRate::Disabled,
            n => UpdateRate::PerSecond(n.unsigned_abs()),
        }
    }

    pub fn updates_per_second(self) -> i32 {
        match self {
            UpdateRate::Unthrottled => 0,
            UpdateRate::PerSecond(n) => i32::try_from(n).unwrap_or(i32::MAX),
            UpdateRate::Disabled => -1,
        }
    }
}

impl Default for UpdateRate {
    fn default() -> Self {
        UpdateRate::PerSecond(60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    pub max_net_threads: u32,
    pub update_rate: UpdateRate,
    pub preferences: PreferencesLocation,
    /// Used when the OS location cannot be determined.
    pub preferences_backup: PreferencesLocation,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self::with_environment(OperatingSystem::current(), &SystemEnvironment)
    }
}

impl ConfigFile for HeadlessConfig {}

impl HeadlessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment<E: Environment + ?Sized>(os: OperatingSystem, env: &E) -> Self {
        let preferences_backup = PreferencesLocation::new(LEGACY_PREFERENCES_DIR, FileType::External);
        Self {
            max_net_threads: u32::MAX,
            update_rate: UpdateRate::default(),
            preferences: prefs::default_location_with_fallback(os, env, &preferences_backup),
            preferences_backup,
        }
    }

    pub fn set_update_rate(&mut self, rate: UpdateRate) {
        self.update_rate = rate;
    }

    pub fn set_max_net_threads(&mut self, threads: u32) {
        self.max_net_threads = threads;
    }

    pub fn set_preferences_config(&mut self, directory: impl Into<String>, file_type: FileType) {
        self.preferences = PreferencesLocation::new(directory, file_type);
    }
}
