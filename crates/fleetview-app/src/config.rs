//! Configuration management for fleetview
//!
//! Config stored at: ~/.config/fleetview/config.toml

use std::path::{Path, PathBuf};

use fleetview_domain::service::DEFAULT_COLLAPSE_THRESHOLD;
use fleetview_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default fleet dataset (CSV)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_path: Option<PathBuf>,

    /// ZIP gazetteer CSV used for geocoding; no geocoding when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_table_path: Option<PathBuf>,

    /// Share of records a make must exceed to avoid the "Other" bucket
    #[serde(default = "default_collapse_threshold")]
    pub collapse_threshold: f64,

    /// Geocoding worker threads (0 = one per CPU)
    #[serde(default)]
    pub geocode_jobs: usize,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_collapse_threshold() -> f64 {
    DEFAULT_COLLAPSE_THRESHOLD
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: None,
            zip_table_path: None,
            collapse_threshold: default_collapse_threshold(),
            geocode_jobs: 0,
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetview");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.collapse_threshold) {
            return Err(ConfigError::InvalidValue(format!(
                "collapse_threshold must be within [0, 1], got {}",
                self.collapse_threshold
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn path_or_unset(path: &Option<PathBuf>) -> String {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        }

        writeln!(f, "Fleetview Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "Dataset:            {}", path_or_unset(&self.dataset_path))?;
        writeln!(f, "ZIP table:          {}", path_or_unset(&self.zip_table_path))?;
        writeln!(f, "Collapse threshold: {}", self.collapse_threshold)?;
        writeln!(
            f,
            "Geocode jobs:       {}",
            if self.geocode_jobs == 0 {
                "auto".to_string()
            } else {
                self.geocode_jobs.to_string()
            }
        )?;
        writeln!(f, "Output format:      {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:        {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetview_types::Error;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.collapse_threshold, 0.02);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            zip_table_path: Some(PathBuf::from("/data/zips.csv")),
            collapse_threshold: 0.05,
            geocode_jobs: 8,
            output_format: OutputFormat::Json,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "geocode_jobs = 2\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.geocode_jobs, 2);
        assert_eq!(config.collapse_threshold, DEFAULT_COLLAPSE_THRESHOLD);
        assert_eq!(config.output_format, OutputFormat::Table);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "collapse_threshold = 1.5\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidValue(_))));
    }
}
