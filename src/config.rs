use std::path::{Path, PathBuf};
use anyhow::{Result, Context, bail};
use log::debug;
use serde::{Serialize, Deserialize};

use crate::utils::file_utils;

/// Placeholder substituted with the year in `tariff_file_pattern`
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Where the dashboard finds its source files and which years it loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Root data directory
    pub data_dir: PathBuf,

    /// Directory holding the per-year tariff files, relative to `data_dir`
    pub tariff_subdir: PathBuf,

    /// File name of a per-year tariff file; `{year}` is replaced by the year
    pub tariff_file_pattern: String,

    /// Reference file listing the classification codes, relative to `data_dir`
    pub classification_file: PathBuf,

    /// Years to load, in order
    pub years: Vec<i32>,

    /// Year used for point-in-time rate lookups
    pub target_year: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tariff_subdir: PathBuf::from("tariff_semi"),
            tariff_file_pattern: "tariff_semi_{year}_with_info.csv".to_string(),
            classification_file: PathBuf::from("unique_hscode_semi.csv"),
            years: (2020..=2025).collect(),
            target_year: 2025,
        }
    }
}

impl DashboardConfig {
    /// Default configuration rooted at another data directory
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)
            .context("Failed to parse dashboard configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = file_utils::read_text_file(path)?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    /// Reject an empty year list or a file pattern without `{year}`
    pub fn validate(&self) -> Result<()> {
        if self.years.is_empty() {
            bail!("at least one year must be configured");
        }
        if !self.tariff_file_pattern.contains(YEAR_PLACEHOLDER) {
            bail!("tariff_file_pattern must contain {}", YEAR_PLACEHOLDER);
        }
        Ok(())
    }

    /// Directory holding the per-year tariff files
    pub fn tariff_dir(&self) -> PathBuf {
        self.data_dir.join(&self.tariff_subdir)
    }

    /// Path of the tariff file for one year
    pub fn year_file(&self, year: i32) -> PathBuf {
        let name = self.tariff_file_pattern.replace(YEAR_PLACEHOLDER, &year.to_string());
        self.tariff_dir().join(name)
    }

    /// Path of the classification code reference file
    pub fn classification_path(&self) -> PathBuf {
        self.data_dir.join(&self.classification_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_layout() {
        let config = DashboardConfig::default();
        assert_eq!(config.years, vec![2020, 2021, 2022, 2023, 2024, 2025]);
        assert_eq!(config.target_year, 2025);
        assert_eq!(
            config.year_file(2023),
            PathBuf::from("data/tariff_semi/tariff_semi_2023_with_info.csv")
        );
        assert_eq!(config.classification_path(), PathBuf::from("data/unique_hscode_semi.csv"));
    }

    #[test]
    fn test_toml_overrides_keep_other_defaults() -> Result<()> {
        let config = DashboardConfig::from_toml_str(
            r#"
            data_dir = "/srv/tariffs"
            years = [2024, 2025]
            "#,
        )?;

        assert_eq!(config, DashboardConfig {
            data_dir: PathBuf::from("/srv/tariffs"),
            years: vec![2024, 2025],
            ..DashboardConfig::default()
        });
        Ok(())
    }

    #[test]
    fn test_invalid_configurations_are_rejected() {
        assert!(DashboardConfig::from_toml_str("years = []").is_err());
        assert!(DashboardConfig::from_toml_str("tariff_file_pattern = \"rates.csv\"").is_err());
        assert!(DashboardConfig::from_toml_str("unknown_key = 1").is_err());
    }
}
