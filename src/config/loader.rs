use super::types::FileConfig;
use crate::core::errors::ConfigError;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATHS: &[&str] = &["./badprint.toml", "~/.config/badprint/config.toml"];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load scan defaults from a TOML file, falling back to built-in defaults.
    pub fn load(custom_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = custom_path {
            if path.exists() {
                return Self::load_from_file(path);
            }
            tracing::warn!("Config path does not exist: {:?}, falling back to defaults", path);
        }

        for default_path in DEFAULT_CONFIG_PATHS {
            let path = Self::expand_path(default_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from: {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                        continue;
                    }
                }
            }
        }

        tracing::debug!("No configuration file found, using default settings");
        Ok(FileConfig::default())
    }

    fn load_from_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(path)
    }
}
