pub mod operations;

// Re-export main types and functions for easier access
pub use operations::{TariffStore, load_classification_codes, load_unified_table};
