use std::cmp::Ordering;
use std::collections::HashSet;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::tariff::{CountryScope, TariffColumn, TariffRecord, TariffTable, ITEM_NAME_HEADERS};
use super::countries::is_recognized_country;
use super::error::QueryError;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Outcome of a country rate lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolveStatus {
    /// At least one rate applies
    Applicable,
    /// Rows exist for the code and year, but none applies to the country
    NoApplicableRate,
    /// The code has no rows in the requested year
    NoRecordsForYear,
    /// The data lacks the country scope or country list column
    NotComputable,
}

/// Rates applicable to one country for one code and year
#[derive(Debug, Clone, Serialize)]
pub struct CountryRates<'a> {
    pub rows: Vec<&'a TariffRecord>,
    pub status: ResolveStatus,
}

/// Whole-token matcher for whitespace-separated country lists
#[derive(Debug, Clone)]
pub struct CountryMatcher {
    pattern: Regex,
}

impl CountryMatcher {
    /// Build a matcher for one country name
    pub fn new(country: &str) -> Self {
        let pattern = format!(r"(?:^|\s){}(?:\s|$)", regex::escape(country));
        Self {
            // an escaped literal between fixed groups always compiles
            pattern: Regex::new(&pattern).expect("escaped country pattern"),
        }
    }

    /// Whether the country appears as a whole token in `country_list`
    pub fn matches(&self, country_list: &str) -> bool {
        let normalized = normalize_whitespace(country_list);
        self.pattern.is_match(&normalized)
    }
}

/// Collapse whitespace runs into single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Test whether `country` is a whole token of `country_list`
pub fn token_match_country(country_list: &str, country: &str) -> bool {
    CountryMatcher::new(country).matches(country_list)
}

/// Drop rows sharing `(rate_category_value, rate_percent_raw)` with an earlier row
pub fn dedup_rates<'a>(rows: Vec<&'a TariffRecord>) -> Vec<&'a TariffRecord> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| seen.insert((r.rate_category_value.as_str(), r.rate_percent_raw.as_str())))
        .collect()
}

/// Ascending by numeric rate; rows without one go last, ordered by raw text
pub fn compare_rates(a: &TariffRecord, b: &TariffRecord) -> Ordering {
    match (a.rate_percent_numeric, b.rate_percent_numeric) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.rate_percent_raw.cmp(&b.rate_percent_raw),
    }
}

fn check_code_column(table: &TariffTable) -> Result<(), QueryError> {
    if table.is_empty() {
        return Err(QueryError::EmptyTable);
    }
    if !table.has_column(TariffColumn::ClassificationCode) {
        return Err(QueryError::MissingColumn(TariffColumn::ClassificationCode));
    }
    Ok(())
}

/// Determine which rates legally apply to imports of `code` from `country` in `year`
///
/// Rows scoped to all countries always apply. Country-specific rows apply
/// when the country is a whole token of their country list. The union is
/// deduplicated on `(rate_category_value, rate_percent_raw)` and sorted by rate.
pub fn resolve_country_rates<'a>(
    table: &'a TariffTable,
    code: &str,
    year: i32,
    country: &str,
) -> Result<CountryRates<'a>, QueryError> {
    check_code_column(table)?;
    if !is_recognized_country(country) {
        return Err(QueryError::UnknownCountry(country.to_string()));
    }

    if !table.has_column(TariffColumn::CountryScope) || !table.has_column(TariffColumn::CountryList) {
        debug!("Country scope columns missing; cannot resolve rates for {}", country);
        return Ok(CountryRates { rows: Vec::new(), status: ResolveStatus::NotComputable });
    }

    let candidates = table.records_for(code, year);
    if candidates.is_empty() {
        return Ok(CountryRates { rows: Vec::new(), status: ResolveStatus::NoRecordsForYear });
    }

    let matcher = CountryMatcher::new(country);
    let (base, specific): (Vec<&TariffRecord>, Vec<&TariffRecord>) = candidates.into_iter()
        .filter(|r| matches!(r.country_scope, CountryScope::All | CountryScope::Specific))
        .partition(|r| r.country_scope == CountryScope::All);

    let mut rows = base;
    rows.extend(specific.into_iter().filter(|r| matcher.matches(&r.country_list_raw)));

    let mut rows = dedup_rates(rows);
    rows.sort_by(|a, b| compare_rates(a, b));

    debug!("{} rates apply to {} for {} in {}", rows.len(), country, code, year);
    let status = if rows.is_empty() {
        ResolveStatus::NoApplicableRate
    } else {
        ResolveStatus::Applicable
    };
    Ok(CountryRates { rows, status })
}

/// Every rate row for `code` in `year` regardless of country, sorted by rate
pub fn rates_for_year<'a>(table: &'a TariffTable, code: &str, year: i32) -> Result<Vec<&'a TariffRecord>, QueryError> {
    check_code_column(table)?;
    let mut rows = table.records_for(code, year);
    rows.sort_by(|a, b| compare_rates(a, b));
    Ok(rows)
}

/// Representative product name for a classification code
///
/// Name columns are tried in `ITEM_NAME_HEADERS` order across every row of
/// the code; the first value of the first column carrying one wins.
pub fn item_name<'a>(table: &'a TariffTable, code: &str) -> Option<&'a str> {
    ITEM_NAME_HEADERS.iter().find_map(|header| {
        table.records_for_code(code).find_map(|r| r.item_name(header))
    })
}
