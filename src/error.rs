//! Error types for the renewal projection engine
//!
//! Degraded numeric inputs are not errors: they surface as
//! [`ProjectedRenewal::NotAvailable`](crate::records::ProjectedRenewal) or as
//! `None` metrics. The variants here cover I/O, data-quality reports and keyed
//! lookups the caller has to react to.

use thiserror::Error;

/// Errors reported by the engine and its ingestion boundary
#[derive(Debug, Error)]
pub enum RenewalError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Row has neither a proposed nor a standard increase
    #[error("property {property:?} has no standard or proposed increase")]
    MissingIncrease { property: String },

    /// Edit addressed a row that does not exist
    #[error("row index {index} out of range for {len} driver rows")]
    RowOutOfRange { index: usize, len: usize },

    /// Keyed rent summary lookup had no match
    #[error("property {property:?} not found")]
    NotFound { property: String },

    /// A selection was superseded before its fetch resolved
    #[error("selection of {property:?} was superseded")]
    StaleSelection { property: String },
}

impl RenewalError {
    /// True for the keyed-lookup miss the presentation layer renders as a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenewalError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RenewalError>;
