// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Runtime configuration.
//!
//! Read from a YAML file at `$SKETCHBOOK_CONFIG`, or `config.yaml` in the
//! platform config directory. Every field has a default, so a missing file
//! or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SKETCHBOOK_CONFIG";

const APP_DIR: &str = "sketchbook";
const DEFAULT_STORAGE_KEY: &str = "sketchbook_projects";
const DEFAULT_UNTITLED_PREFIX: &str = "Untitled";
/// Same order of magnitude as a browser's local storage budget.
const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding persisted sessions.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Storage key for the project list.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Largest session payload storage will accept.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
    /// Name stem for projects created without a name.
    #[serde(default = "default_untitled_prefix")]
    pub untitled_prefix: String,
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_quota_bytes() -> usize {
    DEFAULT_QUOTA_BYTES
}

fn default_untitled_prefix() -> String {
    DEFAULT_UNTITLED_PREFIX.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
            quota_bytes: default_quota_bytes(),
            untitled_prefix: default_untitled_prefix(),
        }
    }
}

impl Config {
    /// Where the config file is looked up.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
    }

    /// Load from [`default_path`](Self::default_path), or defaults if there
    /// is no file.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Config =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.sanitize();
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Put back defaults for values that cannot work.
    pub fn sanitize(&mut self) {
        if self.quota_bytes == 0 {
            self.quota_bytes = DEFAULT_QUOTA_BYTES;
        }
        if self.storage_key.trim().is_empty() {
            self.storage_key = default_storage_key();
        }
        if self.untitled_prefix.trim().is_empty() {
            self.untitled_prefix = default_untitled_prefix();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("absent.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "storage_key: my_drawings\nquota_bytes: 2048\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage_key, "my_drawings");
        assert_eq!(config.quota_bytes, 2048);
        assert_eq!(config.untitled_prefix, "Untitled");
    }

    #[test]
    fn test_sanitize_restores_unusable_values() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "storage_key: \"  \"\nquota_bytes: 0\nuntitled_prefix: \"\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage_key, "sketchbook_projects");
        assert_eq!(config.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert_eq!(config.untitled_prefix, "Untitled");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "quota_bytes: [not, a, number]\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
