//! Application Configuration
//! Optional `gridpanel.json` in the working directory; every field has a default.

use crate::data::NumberFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "gridpanel.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ICO cost report
    pub cost_path: PathBuf,
    /// BDGD asset inventory
    pub asset_path: PathBuf,
    pub cost_format: NumberFormat,
    pub asset_format: NumberFormat,
    /// Used when `RUST_LOG` is not set.
    pub log_level: String,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cost_path: PathBuf::from("data/ICO TOTAL.txt"),
            asset_path: PathBuf::from("data/fato.csv"),
            cost_format: NumberFormat::brazilian(),
            asset_format: NumberFormat::plain(),
            log_level: "info".to_string(),
            window_size: [1400.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Read the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.cost_format, NumberFormat::brazilian());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "asset_path": "/srv/bdgd/fato.csv",
                 "cost_format": { "thousands": null, "decimal": "." } }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.asset_path, PathBuf::from("/srv/bdgd/fato.csv"));
        assert_eq!(config.cost_format, NumberFormat::plain());
        assert_eq!(config.cost_path, AppConfig::default().cost_path);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Json { .. })
        ));
    }
}
