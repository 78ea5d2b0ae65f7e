use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use anyhow::{Result, Context};
use csv::ReaderBuilder;
use log::{debug, trace};

use crate::tariff::types::{CountryScope, TariffColumn, TariffRecord, ITEM_NAME_HEADERS};
use crate::utils::file_utils;

/// Records and column set parsed from one yearly file
#[derive(Debug, Clone, Default)]
pub struct ParsedTariffFile {
    pub records: Vec<TariffRecord>,
    pub columns: BTreeSet<TariffColumn>,
    /// Rows whose rate text was present but not numeric
    pub unparsable_rates: usize,
}

/// Positions of the known columns within one file's header row
#[derive(Debug, Default)]
struct ColumnPositions {
    code: Option<usize>,
    category: Option<usize>,
    category_value: Option<usize>,
    rate: Option<usize>,
    scope: Option<usize>,
    countries: Option<usize>,
    item_names: Vec<(&'static str, usize)>,
}

impl ColumnPositions {
    fn from_headers(headers: &[String]) -> Self {
        let find = |column: TariffColumn| headers.iter().position(|h| h == column.header());

        Self {
            code: find(TariffColumn::ClassificationCode),
            category: find(TariffColumn::RateCategory),
            category_value: find(TariffColumn::RateCategoryValue),
            rate: find(TariffColumn::Rate),
            scope: find(TariffColumn::CountryScope),
            countries: find(TariffColumn::CountryList),
            item_names: ITEM_NAME_HEADERS.iter()
                .filter_map(|&name| headers.iter().position(|h| h == name).map(|i| (name, i)))
                .collect(),
        }
    }

    fn present(&self) -> BTreeSet<TariffColumn> {
        let mut columns = BTreeSet::new();
        let known = [
            (self.code, TariffColumn::ClassificationCode),
            (self.category, TariffColumn::RateCategory),
            (self.category_value, TariffColumn::RateCategoryValue),
            (self.rate, TariffColumn::Rate),
            (self.scope, TariffColumn::CountryScope),
            (self.countries, TariffColumn::CountryList),
        ];
        for (position, column) in known {
            if position.is_some() {
                columns.insert(column);
            }
        }
        if !self.item_names.is_empty() {
            columns.insert(TariffColumn::ItemName);
        }
        columns
    }
}

/// Parser for one yearly tariff CSV file
#[derive(Debug, Default)]
pub struct TariffFileParser;

impl TariffFileParser {
    /// Create a new tariff file parser
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a yearly file, tagging every row with `year`
    pub fn parse_file(&self, path: impl AsRef<Path>, year: i32) -> Result<ParsedTariffFile> {
        let path = path.as_ref();
        debug!("Parsing tariff file for {}: {}", year, path.display());

        let content = file_utils::read_text_file(path)?;
        self.parse_content(&content, year)
            .with_context(|| format!("Failed to parse tariff file {}", path.display()))
    }

    /// Parse CSV text, tagging every row with `year`
    pub fn parse_content(&self, content: &str, year: i32) -> Result<ParsedTariffFile> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()
            .context("Failed to read header row")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let positions = ColumnPositions::from_headers(&headers);
        trace!("Header row for {}: {:?}", year, headers);

        let mut parsed = ParsedTariffFile {
            columns: positions.present(),
            ..ParsedTariffFile::default()
        };

        for (line_idx, row) in reader.records().enumerate() {
            // +2 for the header row and 0-indexing
            let row = row.with_context(|| format!("Malformed CSV row at line {}", line_idx + 2))?;
            let field = |position: Option<usize>| position.and_then(|i| row.get(i)).unwrap_or("");

            let rate_percent_raw = field(positions.rate).to_string();
            let rate_percent_numeric = TariffRecord::parse_rate(&rate_percent_raw);
            if rate_percent_numeric.is_none() && !rate_percent_raw.trim().is_empty() {
                parsed.unparsable_rates += 1;
            }

            let item_names: BTreeMap<String, String> = positions.item_names.iter()
                .filter_map(|&(header, i)| row.get(i).map(|value| (header, value.trim())))
                .filter(|(_, value)| !value.is_empty())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect();

            parsed.records.push(TariffRecord {
                classification_code: field(positions.code).trim().to_string(),
                year,
                rate_category: field(positions.category).to_string(),
                rate_category_value: field(positions.category_value).to_string(),
                rate_percent_raw,
                rate_percent_numeric,
                country_scope: CountryScope::from_raw(field(positions.scope)),
                country_list_raw: field(positions.countries).to_string(),
                item_names,
            });
        }

        debug!("Parsed {} rows for {}", parsed.records.len(), year);
        Ok(parsed)
    }
}
