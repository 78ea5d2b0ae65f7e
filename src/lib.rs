pub mod classification;
pub mod config;
pub mod query;
pub mod store;
pub mod tariff;
pub mod utils;

// Re-export main types and functions for easier access
pub use config::DashboardConfig;
pub use tariff::{CountryScope, TariffColumn, TariffRecord, TariffTable};
pub use tariff::{LoadResult, LoadStats, RecordLoader};
pub use store::{TariffStore, load_classification_codes, load_unified_table};

pub use query::{QueryError, ResolveStatus, CountryRates, YearlyMean};
pub use query::{aggregate_yearly_mean, resolve_country_rates, rates_for_year, item_name};
pub use query::{COUNTRIES, search_countries, token_match_country};
pub use classification::{CodeSearch, search_codes};

// Re-export utility functions
pub use utils::file_utils;
