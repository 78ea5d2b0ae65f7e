use anyhow::Result;
use log::info;
use once_cell::sync::{Lazy, OnceCell};

use crate::classification::{self, CodeSearch};
use crate::config::DashboardConfig;
use crate::tariff::{LoadStats, RecordLoader, TariffTable};

/// Memoized, read-only access to the unified table and the code list
///
/// Each source is loaded at most once per store. A failed load is not
/// cached, so the next call retries.
#[derive(Debug)]
pub struct TariffStore {
    config: DashboardConfig,
    table: OnceCell<(TariffTable, LoadStats)>,
    codes: OnceCell<Vec<String>>,
}

impl TariffStore {
    /// Create a new store; nothing is read until first use
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: OnceCell::new(),
            codes: OnceCell::new(),
        }
    }

    /// Create a new store with the default configuration
    pub fn with_defaults() -> Self {
        Self::new(DashboardConfig::default())
    }

    /// Get the configuration of this store
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn loaded(&self) -> Result<&(TariffTable, LoadStats)> {
        self.table.get_or_try_init(|| {
            info!("Loading tariff data from {}", self.config.tariff_dir().display());
            let result = RecordLoader::new(self.config.clone()).load()?;
            Ok((result.table, result.stats))
        })
    }

    /// The unified table, loaded on first use
    pub fn table(&self) -> Result<&TariffTable> {
        self.loaded().map(|(table, _)| table)
    }

    /// Statistics of the load behind `table`
    pub fn load_stats(&self) -> Result<&LoadStats> {
        self.loaded().map(|(_, stats)| stats)
    }

    /// The classification code list, loaded on first use
    pub fn codes(&self) -> Result<&[String]> {
        let codes = self.codes.get_or_try_init(|| {
            classification::load_codes(self.config.classification_path())
        })?;
        Ok(codes.as_slice())
    }

    /// Search the classification codes by prefix
    pub fn search_codes(&self, prefix: &str) -> Result<CodeSearch> {
        Ok(classification::search_codes(self.codes()?, prefix))
    }
}

static DEFAULT_STORE: Lazy<TariffStore> = Lazy::new(TariffStore::with_defaults);

/// Unified table from the default configuration, loaded once per process
pub fn load_unified_table() -> Result<&'static TariffTable> {
    DEFAULT_STORE.table()
}

/// Classification codes from the default configuration, loaded once per process
pub fn load_classification_codes() -> Result<&'static [String]> {
    DEFAULT_STORE.codes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_table_is_loaded_once() -> Result<()> {
        let dir = tempdir()?;
        let config = DashboardConfig::with_data_dir(dir.path());
        fs::create_dir_all(config.tariff_dir())?;
        fs::write(config.year_file(2020), "품목번호,관세율\n8542,8\n")?;

        let store = TariffStore::new(config.clone());
        let first = store.table()?;
        assert_eq!(first.len(), 1);

        // later changes on disk are not observed by the memoized table
        fs::write(config.year_file(2021), "품목번호,관세율\n8542,4\n")?;
        let second = store.table()?;
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_reference_file_is_an_error_and_retried() -> Result<()> {
        let dir = tempdir()?;
        let config = DashboardConfig::with_data_dir(dir.path());
        let store = TariffStore::new(config.clone());

        assert!(store.codes().is_err());

        fs::write(config.classification_path(), "HS코드\n8542\n")?;
        assert_eq!(store.codes()?, &["8542".to_string()]);
        Ok(())
    }
}
