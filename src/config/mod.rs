// Application configuration records and their TOML persistence

pub mod application;
pub mod headless;

pub use application::{ApplicationConfig, AudioConfig, BackBufferConfig, GlesConfig};
pub use headless::{HeadlessConfig, UpdateRate};

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ConfigResult;

/// Whether window sizes and input coordinates are reported in logical
/// (OS-scaled) or physical pixels on HDPI displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HdpiMode {
    #[default]
    Logical,
    Pixels,
}

impl HdpiMode {
    pub fn toggled(self) -> Self {
        match self {
            HdpiMode::Logical => HdpiMode::Pixels,
            HdpiMode::Pixels => HdpiMode::Logical,
        }
    }
}

/// Where GL debug messages go.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugOutput {
    #[default]
    Stderr,
    Stdout,
    File(PathBuf),
}

impl DebugOutput {
    /// Opens the target for writing; files are appended to.
    pub fn open(&self) -> io::Result<Box<dyn Write + Send>> {
        match self {
            DebugOutput::Stderr => Ok(Box::new(io::stderr())),
            DebugOutput::Stdout => Ok(Box::new(io::stdout())),
            DebugOutput::File(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file: File = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(Box::new(file))
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            DebugOutput::Stderr => "stderr".to_string(),
            DebugOutput::Stdout => "stdout".to_string(),
            DebugOutput::File(path) => path.display().to_string(),
        }
    }
}

/// TOML load/save shared by the configuration records.
pub trait ConfigFile: Serialize + DeserializeOwned {
    fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
