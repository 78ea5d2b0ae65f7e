use std::collections::BTreeMap;
use log::debug;
use serde::Serialize;

use crate::tariff::{TariffColumn, TariffTable};
use super::error::QueryError;

/// Mean numeric rate of one classification code in one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyMean {
    pub year: i32,
    pub mean_rate: f64,
}

/// Per-year arithmetic mean of the numeric rates of `code`, ascending by year
///
/// Rows without a numeric rate are ignored. A year with no numeric rate is
/// left out of the result entirely; it is not reported as zero.
pub fn aggregate_yearly_mean(table: &TariffTable, code: &str) -> Result<Vec<YearlyMean>, QueryError> {
    if table.is_empty() {
        return Err(QueryError::EmptyTable);
    }
    for column in [TariffColumn::ClassificationCode, TariffColumn::Rate] {
        if !table.has_column(column) {
            return Err(QueryError::MissingColumn(column));
        }
    }

    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for record in table.records_for_code(code) {
        if let Some(rate) = record.rate_percent_numeric {
            let entry = sums.entry(record.year).or_insert((0.0, 0));
            entry.0 += rate;
            entry.1 += 1;
        }
    }

    let trend: Vec<YearlyMean> = sums.into_iter()
        .map(|(year, (sum, count))| YearlyMean { year, mean_rate: sum / count as f64 })
        .collect();
    debug!("Trend for {} covers {} years", code, trend.len());
    Ok(trend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use pretty_assertions::assert_eq;
    use crate::tariff::{CountryScope, TariffRecord};

    fn record(code: &str, year: i32, rate: &str) -> TariffRecord {
        TariffRecord {
            classification_code: code.to_string(),
            year,
            rate_category: String::new(),
            rate_category_value: String::new(),
            rate_percent_raw: rate.to_string(),
            rate_percent_numeric: TariffRecord::parse_rate(rate),
            country_scope: CountryScope::All,
            country_list_raw: String::new(),
            item_names: BTreeMap::new(),
        }
    }

    fn table(records: Vec<TariffRecord>) -> TariffTable {
        let years = records.iter().map(|r| r.year).collect::<BTreeSet<_>>().into_iter().collect();
        TariffTable::new(
            records,
            BTreeSet::from([TariffColumn::ClassificationCode, TariffColumn::Rate]),
            years,
        )
    }

    #[test]
    fn test_years_without_numeric_rates_are_omitted() {
        let table = table(vec![
            record("8542", 2020, "10"),
            record("8542", 2020, "20"),
            record("8542", 2021, "무세"),
        ]);

        assert_eq!(
            aggregate_yearly_mean(&table, "8542").unwrap(),
            vec![YearlyMean { year: 2020, mean_rate: 15.0 }]
        );
    }

    #[test]
    fn test_sparse_years_and_other_codes() {
        let table = table(vec![
            record("8542", 2022, "4"),
            record("8486", 2021, "3"),
            record("8542", 2020, "8"),
        ]);

        assert_eq!(
            aggregate_yearly_mean(&table, "8542").unwrap(),
            vec![
                YearlyMean { year: 2020, mean_rate: 8.0 },
                YearlyMean { year: 2022, mean_rate: 4.0 },
            ]
        );
        assert!(aggregate_yearly_mean(&table, "9999").unwrap().is_empty());
    }

    #[test]
    fn test_missing_rate_column_and_empty_table() {
        assert_eq!(aggregate_yearly_mean(&TariffTable::empty(), "8542"), Err(QueryError::EmptyTable));

        let table = TariffTable::new(
            vec![record("8542", 2020, "")],
            BTreeSet::from([TariffColumn::ClassificationCode]),
            vec![2020],
        );
        assert_eq!(
            aggregate_yearly_mean(&table, "8542"),
            Err(QueryError::MissingColumn(TariffColumn::Rate))
        );
    }
}
