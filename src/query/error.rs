use thiserror::Error;

use crate::tariff::TariffColumn;

/// Conditions that stop a query from producing any answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No yearly tariff file was loaded
    #[error("no tariff data loaded; check the data directory and file names")]
    EmptyTable,

    /// A column the query depends on is absent from every loaded file
    #[error("tariff data has no '{0}' column")]
    MissingColumn(TariffColumn),

    /// The country is not part of the fixed country list
    #[error("unrecognized country: {0}")]
    UnknownCountry(String),
}
