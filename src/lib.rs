//! Renewal Projection - projected rent renewals for a leased property portfolio
//!
//! This library provides:
//! - Historical baselines from billing (expiration) rows
//! - Increase resolution (proposed override vs. standard rate)
//! - Projected renewals via a batch path and an interactive edit path
//! - Portfolio metrics and chart series kept in step with every edit
//! - A session context that owns the mutable driver rows

pub mod config;
pub mod error;
pub mod records;
pub mod projection;
pub mod metrics;
pub mod series;
pub mod source;
pub mod session;

// Re-export commonly used types
pub use config::RenewalConfig;
pub use error::RenewalError;
pub use records::{DriverRow, ExpirationRow, ProjectedRenewal, RentSummaryRow};
pub use projection::{apply_proposed_increase_edit, batch_recompute_projections, ProjectionEngine};
pub use metrics::{compute_portfolio_metrics, PortfolioMetrics};
pub use series::{
    build_increase_by_property_series, build_renewal_trend_series, ChartSeries, Dataset,
};
pub use source::{CsvPortfolio, InMemoryPortfolio, PortfolioSource};
pub use session::{SelectionTicket, Session};
