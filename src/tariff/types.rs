use std::collections::{BTreeMap, BTreeSet, HashMap};
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

/// Column of a per-year tariff file that the dashboard understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TariffColumn {
    /// Classification code (`품목번호`)
    ClassificationCode,
    /// Rate regime label (`관세율구분`)
    RateCategory,
    /// Sub-key within a regime (`관세율구분값`)
    RateCategoryValue,
    /// Textual rate (`관세율`)
    Rate,
    /// Country scope indicator (`적용국가구분`)
    CountryScope,
    /// Whitespace-separated country names (`국가`)
    CountryList,
    /// Any of the product-name columns
    ItemName,
}

impl TariffColumn {
    /// Header used for this column in the source files
    pub fn header(self) -> &'static str {
        match self {
            TariffColumn::ClassificationCode => "품목번호",
            TariffColumn::RateCategory => "관세율구분",
            TariffColumn::RateCategoryValue => "관세율구분값",
            TariffColumn::Rate => "관세율",
            TariffColumn::CountryScope => "적용국가구분",
            TariffColumn::CountryList => "국가",
            TariffColumn::ItemName => "품명",
        }
    }
}

impl std::fmt::Display for TariffColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// Whether a rate row applies to every country or to a listed subset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountryScope {
    /// Applies to all countries (source value `1`)
    All,
    /// Applies only to the countries in `country_list_raw` (source value `2`)
    Specific,
    /// Anything else, kept verbatim
    Other(String),
}

impl CountryScope {
    /// Classify a raw scope indicator
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "1" => CountryScope::All,
            "2" => CountryScope::Specific,
            other => CountryScope::Other(other.to_string()),
        }
    }
}

impl Default for CountryScope {
    fn default() -> Self {
        CountryScope::Other(String::new())
    }
}

/// Product-name columns, most specific first
pub const ITEM_NAME_HEADERS: [&str; 5] = ["품명", "품목명", "이름", "소분류", "대분류"];

/// One row of the unified tariff table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffRecord {
    /// Classification code, trimmed
    pub classification_code: String,

    /// Year of the source file this row was loaded from
    pub year: i32,

    /// Regime label (general, MFN, FTA, ...)
    pub rate_category: String,

    /// Sub-key distinguishing rows within one category
    pub rate_category_value: String,

    /// Rate as written in the source file
    pub rate_percent_raw: String,

    /// Parsed rate, absent when the raw text is not numeric
    pub rate_percent_numeric: Option<f64>,

    /// Country applicability of this row
    pub country_scope: CountryScope,

    /// Countries the row applies to when the scope is `Specific`
    pub country_list_raw: String,

    /// Non-blank product-name values keyed by their column header
    pub item_names: BTreeMap<String, String>,
}

impl TariffRecord {
    /// Parse a raw rate string, ignoring thousands separators
    pub fn parse_rate(raw: &str) -> Option<f64> {
        let cleaned = raw.replace(',', "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|value| !value.is_nan())
    }

    /// Product name stored under one of `ITEM_NAME_HEADERS`
    pub fn item_name(&self, header: &str) -> Option<&str> {
        self.item_names.get(header).map(String::as_str)
    }
}

/// The unified, read-only table of tariff records across all loaded years
#[derive(Debug, Clone, Serialize)]
pub struct TariffTable {
    /// Records in load order (configured year order, then file order)
    records: Vec<TariffRecord>,

    /// Columns present in at least one loaded file
    columns: BTreeSet<TariffColumn>,

    /// Years whose source file was found and loaded
    years: Vec<i32>,

    /// Row indices keyed by classification code, then year
    #[serde(skip)]
    index: HashMap<String, BTreeMap<i32, Vec<usize>>>,

    /// When this table was built
    loaded_at: DateTime<Utc>,
}

impl TariffTable {
    /// Build a table and its `(code, year)` index
    pub fn new(records: Vec<TariffRecord>, columns: BTreeSet<TariffColumn>, years: Vec<i32>) -> Self {
        let mut index: HashMap<String, BTreeMap<i32, Vec<usize>>> = HashMap::new();
        for (row, record) in records.iter().enumerate() {
            index
                .entry(record.classification_code.clone())
                .or_default()
                .entry(record.year)
                .or_default()
                .push(row);
        }

        Self {
            records,
            columns,
            years,
            index,
            loaded_at: Utc::now(),
        }
    }

    /// An empty table, returned when no source file was found
    pub fn empty() -> Self {
        Self::new(Vec::new(), BTreeSet::new(), Vec::new())
    }

    /// Get all records in load order
    pub fn records(&self) -> &[TariffRecord] {
        &self.records
    }

    /// Number of records across all years
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was loaded at all
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the years that had a source file
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// When the table was built
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Whether any loaded file carried the given column
    pub fn has_column(&self, column: TariffColumn) -> bool {
        self.columns.contains(&column)
    }

    /// All records for a classification code, in year order
    pub fn records_for_code<'a>(&'a self, code: &str) -> impl Iterator<Item = &'a TariffRecord> + 'a {
        self.index
            .get(code.trim())
            .into_iter()
            .flat_map(|years| years.values())
            .flatten()
            .map(move |&row| &self.records[row])
    }

    /// Records for one classification code in one year, in file order
    pub fn records_for(&self, code: &str, year: i32) -> Vec<&TariffRecord> {
        self.index
            .get(code.trim())
            .and_then(|years| years.get(&year))
            .map(|rows| rows.iter().map(|&row| &self.records[row]).collect())
            .unwrap_or_default()
    }

    /// Whether any record exists for the classification code
    pub fn contains_code(&self, code: &str) -> bool {
        self.index.contains_key(code.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

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

    #[test_case("8", Some(8.0) ; "integer")]
    #[test_case("1,234.5", Some(1234.5) ; "thousands separator")]
    #[test_case(" 3.5 ", Some(3.5) ; "surrounding whitespace")]
    #[test_case("", None ; "blank")]
    #[test_case("무세", None ; "non numeric text")]
    #[test_case("NaN", None ; "nan literal")]
    fn test_parse_rate(raw: &str, expected: Option<f64>) {
        assert_eq!(TariffRecord::parse_rate(raw), expected);
    }

    #[test]
    fn test_country_scope_from_raw() {
        assert_eq!(CountryScope::from_raw("1"), CountryScope::All);
        assert_eq!(CountryScope::from_raw(" 2 "), CountryScope::Specific);
        assert_eq!(CountryScope::from_raw("3"), CountryScope::Other("3".to_string()));
    }

    #[test]
    fn test_index_groups_rows_by_code_and_year() {
        let table = TariffTable::new(
            vec![
                record("8542", 2020, "8"),
                record("8486", 2020, "0"),
                record("8542", 2022, "4"),
                record("8542", 2020, "6"),
            ],
            BTreeSet::from([TariffColumn::ClassificationCode, TariffColumn::Rate]),
            vec![2020, 2022],
        );

        let rates: Vec<&str> = table.records_for("8542", 2020).iter()
            .map(|r| r.rate_percent_raw.as_str())
            .collect();
        assert_eq!(rates, vec!["8", "6"]);

        let years: Vec<i32> = table.records_for_code("8542").map(|r| r.year).collect();
        assert_eq!(years, vec![2020, 2020, 2022]);

        assert!(table.records_for("8542", 2021).is_empty());
        assert!(table.contains_code(" 8486 "));
        assert!(!table.contains_code("9999"));
    }
}
