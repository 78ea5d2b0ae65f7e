mod file_collector;
mod parser;

use std::collections::BTreeSet;
use std::path::PathBuf;
use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::tariff::types::TariffTable;

pub use file_collector::{YearFile, YearFileCollector};
pub use parser::{ParsedTariffFile, TariffFileParser};

/// Statistics about one load of the yearly tariff files
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoadStats {
    /// Number of yearly files found and parsed
    pub files_loaded: usize,

    /// Configured files that did not exist
    pub missing_files: Vec<PathBuf>,

    /// Total rows across all loaded files
    pub total_rows: usize,

    /// Rows whose rate text could not be parsed as a number
    pub unparsable_rates: usize,
}

/// Unified table together with the statistics of the load that built it
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub table: TariffTable,
    pub stats: LoadStats,
}

/// Reads the configured yearly tariff files into one unified table
#[derive(Debug)]
pub struct RecordLoader {
    collector: YearFileCollector,
    parser: TariffFileParser,
}

impl RecordLoader {
    /// Create a new loader for the configured years
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            collector: YearFileCollector::new(config),
            parser: TariffFileParser::new(),
        }
    }

    /// Load every configured year that has a file
    ///
    /// Missing years are skipped. When no file exists at all the table is
    /// empty and callers must treat that as a blocking condition.
    pub fn load(&self) -> Result<LoadResult> {
        let (files, missing_files) = self.collector.collect();
        if files.is_empty() {
            warn!("No yearly tariff files found; the unified table is empty");
        }

        // collect preserves the configured year order
        let parsed: Vec<(i32, ParsedTariffFile)> = files.par_iter()
            .map(|file| self.parser.parse_file(&file.path, file.year).map(|p| (file.year, p)))
            .collect::<Result<_>>()?;

        let mut stats = LoadStats {
            files_loaded: parsed.len(),
            missing_files,
            ..LoadStats::default()
        };
        let mut records = Vec::new();
        let mut columns = BTreeSet::new();
        let mut years = Vec::with_capacity(parsed.len());

        for (year, file) in parsed {
            stats.unparsable_rates += file.unparsable_rates;
            columns.extend(file.columns);
            records.extend(file.records);
            years.push(year);
        }
        stats.total_rows = records.len();

        info!(
            "Loaded {} tariff rows from {} yearly files ({} missing, {} non-numeric rates)",
            stats.total_rows,
            stats.files_loaded,
            stats.missing_files.len(),
            stats.unparsable_rates
        );

        Ok(LoadResult {
            table: TariffTable::new(records, columns, years),
            stats,
        })
    }
}
