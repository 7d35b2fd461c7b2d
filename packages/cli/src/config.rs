//! CLI configuration loaded from TOML.

use std::path::{Path, PathBuf};

use citizen_map_aggregate::AggregateSettings;
use citizen_map_spatial::DEFAULT_GRID_SPACING_KM;
use citizen_map_store::DEFAULT_MAX_AGE_MINUTES;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings used when no config file is given.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid config TOML.
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// Path of the config file, or `<embedded>` for the default.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Sampling grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Distance between neighboring grid points.
    pub spacing_km: f64,
    /// Minutes after which a cached sample is refetched.
    pub sample_max_age_minutes: i64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing_km: DEFAULT_GRID_SPACING_KM,
            sample_max_age_minutes: DEFAULT_MAX_AGE_MINUTES,
        }
    }
}

/// Top-level `citizen_map.toml` contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub aggregate: AggregateSettings,
    pub grid: GridConfig,
}

impl CliConfig {
    /// Loads the config at `path`, or the embedded defaults when `path`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// * If the file can't be read
    /// * If the file is not valid TOML for [`CliConfig`]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::debug!("No config file given, using embedded defaults");
            return parse(DEFAULT_CONFIG, "<embedded>");
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&contents, &path.display().to_string())?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn parse(contents: &str, origin: &str) -> Result<CliConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_matches_code_defaults() {
        let config = parse(DEFAULT_CONFIG, "<embedded>").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse(
            "[aggregate]\nneighborhood_tolerance = 0.05\n\n[grid]\nspacing_km = 2.5\n",
            "test",
        )
        .unwrap();
        assert!((config.aggregate.neighborhood_tolerance - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.aggregate.recent_limit, 10);
        assert!((config.grid.spacing_km - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.grid.sample_max_age_minutes, 15);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse("[aggregate\n", "broken.toml").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config broken.toml"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/citizen_map.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
