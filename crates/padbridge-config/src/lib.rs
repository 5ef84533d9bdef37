//! `padbridge.yaml` loading and hot reload.

mod parse;
mod v1;
mod watcher;

use std::path::{Path, PathBuf};

use thiserror::Error;

use padbridge_gamepad::{ButtonMapping, Settings};

pub use parse::parse_config;
pub use watcher::{ConfigEvent, ConfigEventReceiver, ConfigWatcher, WatcherError};

/// File name looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = "padbridge.yaml";

/// Everything a config file can set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub settings: Settings,
    pub mapping: ButtonMapping,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml deserialize error: {0}")]
    YamlDeserializeError(#[from] serde_yaml::Error),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),
    #[error("invalid button for {field}: {source}")]
    InvalidButton {
        field: &'static str,
        source: padbridge_gamepad::Error,
    },
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("environment variable not set: {0}")]
    EnvVarNotSet(String),
    #[error("path error: {0}")]
    PathError(#[from] std::io::Error),
}

/// `$HOME/.config/padbridge/padbridge.yaml`, or `%APPDATA%` on Windows.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = if cfg!(windows) {
        let appdata = std::env::var_os("APPDATA")
            .ok_or_else(|| ConfigError::EnvVarNotSet("APPDATA".into()))?;
        PathBuf::from(appdata)
    } else {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| ConfigError::EnvVarNotSet("HOME".into()))?;
        PathBuf::from(home).join(".config")
    };
    Ok(base.join("padbridge").join(CONFIG_FILE_NAME))
}

/// Read and parse a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let input = std::fs::read_to_string(path)?;
    parse_config(&input)
}
