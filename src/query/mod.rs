pub mod error;
pub mod countries;
pub mod resolver;
pub mod trend;

// Re-export the main API for easier access
pub use error::QueryError;
pub use countries::{COUNTRIES, CountrySearch, is_recognized_country, search_countries};
pub use resolver::{
    CountryMatcher, CountryRates, ResolveStatus,
    item_name, rates_for_year, resolve_country_rates, token_match_country,
};
pub use trend::{YearlyMean, aggregate_yearly_mean};
