// Operating system detection and environment access

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingSystem {
    Windows,
    Mac,
    Linux,
    Unknown,
}

impl OperatingSystem {
    pub const ALL: [OperatingSystem; 4] = [
        OperatingSystem::Windows,
        OperatingSystem::Mac,
        OperatingSystem::Linux,
        OperatingSystem::Unknown,
    ];

    /// Classifies an OS name such as `"Windows 10"`, `"Mac OS X"` or `"macos"`.
    /// Matching is a case-insensitive substring test.
    pub fn from_os_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("windows") {
            OperatingSystem::Windows
        } else if name.contains("mac") {
            OperatingSystem::Mac
        } else if name.contains("linux") {
            OperatingSystem::Linux
        } else {
            OperatingSystem::Unknown
        }
    }

    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperatingSystem::Windows => "Windows",
            OperatingSystem::Mac => "macOS",
            OperatingSystem::Linux => "Linux",
            OperatingSystem::Unknown => "Other",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read access to environment variables.
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;

    /// Like [`Environment::var`], but treats an empty value as unset.
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// The live process environment. Values that are not valid unicode count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnvironment {
    vars: BTreeMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Snapshot of the given keys from another environment.
    pub fn capture<E: Environment + ?Sized>(env: &E, keys: &[&str]) -> Self {
        keys.iter()
            .filter_map(|k| env.var(k).map(|v| (k.to_string(), v)))
            .collect()
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = MapEnvironment::new();
        for (k, v) in iter {
            env.set(k, v);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_name_detection() {
        assert_eq!(OperatingSystem::from_os_name("Windows 11"), OperatingSystem::Windows);
        assert_eq!(OperatingSystem::from_os_name("windows"), OperatingSystem::Windows);
        assert_eq!(OperatingSystem::from_os_name("Mac OS X"), OperatingSystem::Mac);
        assert_eq!(OperatingSystem::from_os_name("macos"), OperatingSystem::Mac);
        assert_eq!(OperatingSystem::from_os_name("Linux"), OperatingSystem::Linux);
        assert_eq!(OperatingSystem::from_os_name("FreeBSD"), OperatingSystem::Unknown);
        assert_eq!(OperatingSystem::from_os_name(""), OperatingSystem::Unknown);
    }

    #[test]
    fn test_current_matches_target() {
        let os = OperatingSystem::current();
        if cfg!(target_os = "linux") {
            assert_eq!(os, OperatingSystem::Linux);
        } else if cfg!(target_os = "windows") {
            assert_eq!(os, OperatingSystem::Windows);
        } else if cfg!(target_os = "macos") {
            assert_eq!(os, OperatingSystem::Mac);
        }
    }

    #[test]
    fn test_map_environment() {
        let mut env = MapEnvironment::new().with("HOME", "/home/u").with("EMPTY", "");
        assert_eq!(env.var("HOME").as_deref(), Some("/home/u"));
        assert_eq!(env.var("EMPTY").as_deref(), Some(""));
        assert_eq!(env.non_empty_var("EMPTY"), None);
        assert_eq!(env.var("MISSING"), None);

        env.remove("HOME");
        assert_eq!(env.var("HOME"), None);
    }

    #[test]
    fn test_capture_only_copies_set_keys() {
        let source = MapEnvironment::new().with("A", "1").with("B", "2");
        let captured = MapEnvironment::capture(&source, &["A", "C"]);
        assert_eq!(captured, MapEnvironment::new().with("A", "1"));
    }
}
