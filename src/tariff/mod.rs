pub mod types;
pub mod loader;

// Re-export the main API for easier access
pub use types::{CountryScope, TariffColumn, TariffRecord, TariffTable, ITEM_NAME_HEADERS};
pub use loader::{LoadResult, LoadStats, RecordLoader};
