//! Configuration for the `nook` binary, read from TOML.
//!
//! ```toml
//! working_dir = "/home/me/projects"
//! history_file = "/home/me/.nook_history"
//! prompt = " $ "
//! show_types = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// Looked up in the current directory when no path is given.
pub const CONFIG_FILE: &str = "nook.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Initial working directory of the VM. Defaults to the process's directory.
    pub working_dir: Option<PathBuf>,
    /// Where the REPL keeps its line history. No history is persisted when unset.
    pub history_file: Option<PathBuf>,
    /// Printed after the working directory in the REPL prompt.
    pub prompt: String,
    /// Print the inferred type next to every result.
    pub show_types: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: None,
            history_file: None,
            prompt: "> ".to_string(),
            show_types: false,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// `explicit` if given, else [`CONFIG_FILE`] in `dir` if it exists, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = dir.join(CONFIG_FILE);
        if local.is_file() {
            Self::load(&local)
        } else {
            Ok(Self::default())
        }
    }
}
