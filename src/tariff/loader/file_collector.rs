use std::path::PathBuf;
use log::{debug, trace};

use crate::config::DashboardConfig;

/// A per-year tariff file that exists on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub year: i32,
    pub path: PathBuf,
}

/// Finds the per-year tariff files named by the configuration
#[derive(Debug)]
pub struct YearFileCollector {
    config: DashboardConfig,
}

impl YearFileCollector {
    /// Create a new collector for the configured years
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Split the configured years into files that exist and paths that are missing
    pub fn collect(&self) -> (Vec<YearFile>, Vec<PathBuf>) {
        let mut found = Vec::with_capacity(self.config.years.len());
        let mut missing = Vec::new();

        for &year in &self.config.years {
            let path = self.config.year_file(year);
            if path.is_file() {
                trace!("Found tariff file for {}: {}", year, path.display());
                found.push(YearFile { year, path });
            } else {
                debug!("No tariff file for {} at {}, skipping", year, path.display());
                missing.push(path);
            }
        }

        debug!("Collected {} of {} yearly tariff files", found.len(), self.config.years.len());
        (found, missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_years_are_reported_not_fatal() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let config = DashboardConfig {
            years: vec![2020, 2021, 2022],
            ..DashboardConfig::with_data_dir(dir.path())
        };
        fs::create_dir_all(config.tariff_dir())?;
        fs::write(config.year_file(2021), "품목번호\n")?;

        let (found, missing) = YearFileCollector::new(config.clone()).collect();

        assert_eq!(found, vec![YearFile { year: 2021, path: config.year_file(2021) }]);
        assert_eq!(missing, vec![config.year_file(2020), config.year_file(2022)]);
        Ok(())
    }
}
