//! Registry tool configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use gatepass_registry::DEFAULT_MAX_COMMIT_ATTEMPTS;
use gatepass_store_lmdb::DEFAULT_MAP_SIZE;
use gatepass_types::{RegistryParams, REPLAY_WINDOW};
use gatepass_utils::LogFormat;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for the `gatepass` tool.
///
/// Loaded from a TOML file via [`RegistryConfig::from_toml_file`]; command
/// line flags and `GATEPASS_*` variables override individual fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory holding the LMDB environment and the client mirror.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Accepted lag between a challenge's height and the current height.
    #[serde(default = "default_replay_window")]
    pub replay_window: u64,

    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./gatepass_data")
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_replay_window() -> u64 {
    REPLAY_WINDOW
}

fn default_max_commit_attempts() -> u32 {
    DEFAULT_MAX_COMMIT_ATTEMPTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RegistryConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn params(&self) -> RegistryParams {
        RegistryParams::with_replay_window(self.replay_window)
    }

    pub fn lmdb_dir(&self) -> PathBuf {
        self.data_dir.join("lmdb")
    }

    pub fn mirror_path(&self) -> PathBuf {
        self.data_dir.join("mirror.json")
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            replay_window: default_replay_window(),
            max_commit_attempts: default_max_commit_attempts(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
