use std::path::PathBuf;

pub const APP_DIR: &str = "backendcfg";

/// Paths the inspector works with for one run.
#[derive(Clone, Debug)]
pub struct Session {
    pub config_path: PathBuf,
    pub browse_root: PathBuf,
    pub stylesheet_path: PathBuf,
}

impl Default for Session {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self {
            config_path: config_dir.join("config.toml"),
            browse_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            stylesheet_path: PathBuf::from("./out/cursors.css"),
        }
    }
}

impl Session {
    /// The first argument, when given, replaces the config file path.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut session = Self::default();
        if let Some(path) = args.into_iter().nth(1) {
            session.config_path = PathBuf::from(path);
        }
        session
    }

    pub fn home_dir(&self) -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let session = Session::from_args(["backendcfg".to_string(), "/tmp/game.toml".to_string()]);
        assert_eq!(session.config_path, PathBuf::from("/tmp/game.toml"));

        let session = Session::from_args(["backendcfg".to_string()]);
        assert!(session.config_path.ends_with("backendcfg/config.toml"));
    }
}
