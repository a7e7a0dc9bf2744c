//! CLI configuration, loaded from RON.
//!
//! ```ron
//! (
//!     view: board,
//!     log_filter: "taskboard=debug",
//!     client: (compact_on_delete: true),
//! )
//! ```
//!
//! Every field is optional. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use taskboard_client::ClientConfig;
use tracing::debug;

use crate::view::ViewMode;

/// Default tracing filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How boards are printed.
    pub view: ViewMode,
    /// Tracing filter directive, used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            client: ClientConfig::default(),
        }
    }
}

/// Error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Ron {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Get the config file path (~/.config/taskboard/config.ron).
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("taskboard").join("config.ron"))
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|source| ConfigError::Ron { path: path.to_path_buf(), source })
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match config_file_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text, &path),
            Err(source) if !required && source.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }
}
