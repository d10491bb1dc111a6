//! Dashboard configuration loaded from an optional JSON file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// WHATWG label of the input encoding.
    pub encoding: String,
    pub logo_path: PathBuf,
    pub banner_path: PathBuf,
    /// TrueType/OpenType font with Hangul coverage, used by the UI and PNG export.
    pub font_path: PathBuf,
    /// Regions preselected in the comparison view.
    pub comparison_defaults: Vec<String>,
    /// Number of leading regions preselected in the rate scatter view.
    pub scatter_default_count: usize,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("한국도로교통공단_시도시군구별교통사고통계.csv"),
            encoding: "windows-949".to_string(),
            logo_path: PathBuf::from("logo.png"),
            banner_path: PathBuf::from("road.jpg"),
            font_path: PathBuf::from("fonts/NanumGothic.ttf"),
            comparison_defaults: vec!["서울".to_string(), "경기".to_string()],
            scatter_default_count: 5,
            window_size: [1400.0, 800.0],
        }
    }
}

impl DashboardConfig {
    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = DashboardConfig::load(Path::new("no/such/dashboard.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.encoding, "windows-949");
        assert_eq!(config.scatter_default_count, 5);
    }

    #[test]
    fn test_partial_override() {
        let config = DashboardConfig::from_json(
            r#"{ "data_path": "data/accidents.csv", "comparison_defaults": ["부산"] }"#,
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/accidents.csv"));
        assert_eq!(config.comparison_defaults, vec!["부산".to_string()]);
        assert_eq!(config.logo_path, PathBuf::from("logo.png"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(DashboardConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let path = std::env::temp_dir().join(format!("dashboard_{}.json", std::process::id()));
        fs::write(&path, "{ \"scatter_default_count\": \"five\" }").unwrap();

        let result = DashboardConfig::load(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
