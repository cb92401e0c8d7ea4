//! Projection calculator and its two entry points
//!
//! Both paths share [`project`], so the renewal formula cannot drift between
//! them. They differ only in the base amount:
//!
//! - [`ProjectionEngine::recompute_from_history`] uses the mean historical
//!   scheduled charge for the property.
//! - [`ProjectionEngine::apply_proposed_increase_edit`] uses the row's own
//!   `Base Rent`, or [`RenewalConfig::default_base_rent`] when it has none.
//!
//! The split reproduces long-standing behaviour and is kept on purpose.

use super::baseline::BaselineIndex;
use super::increase::{percent_to_rate, resolve_increase};
use crate::config::RenewalConfig;
use crate::error::{RenewalError, Result};
use crate::records::{DriverRow, ExpirationRow, ProjectedRenewal};
use log::{debug, info, warn};

/// `base * (1 + rate)`, or `NotAvailable` when either operand is non-finite
pub fn project(base: f64, rate: f64) -> ProjectedRenewal {
    if base.is_finite() && rate.is_finite() {
        ProjectedRenewal::from_amount(base * (1.0 + rate))
    } else {
        ProjectedRenewal::NotAvailable
    }
}

/// Project one row from an optional base, logging why a row degrades
fn project_row(row: &DriverRow, base: Option<f64>) -> ProjectedRenewal {
    let rate = match resolve_increase(row) {
        Ok(rate) => rate,
        Err(e) => {
            warn!("{}", e);
            return ProjectedRenewal::NotAvailable;
        }
    };

    let projected = match base {
        Some(base) => project(base, rate),
        None => ProjectedRenewal::NotAvailable,
    };
    if base.is_some() && !projected.is_available() {
        warn!(
            "projection for {:?} not available (base {:?}, rate {})",
            row.property, base, rate
        );
    }
    debug!("{:?}: base {:?} rate {} -> {}", row.property, base, rate, projected);
    projected
}

/// Projection engine bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: RenewalConfig,
}

impl ProjectionEngine {
    pub fn new(config: RenewalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenewalConfig {
        &self.config
    }

    /// Base amount the edit path uses for a row
    pub fn edit_base(&self, row: &DriverRow) -> f64 {
        row.base_rent.unwrap_or(self.config.default_base_rent)
    }

    /// Batch path: re-derive every projection from the historical baseline
    ///
    /// Properties without expiration rows project to `NotAvailable`.
    pub fn recompute_from_history(
        &self,
        driver_rows: &[DriverRow],
        expirations: &[ExpirationRow],
    ) -> Vec<DriverRow> {
        let baselines = BaselineIndex::from_expirations(expirations);
        info!(
            "recomputing {} projections from {} expiration rows ({} properties)",
            driver_rows.len(),
            expirations.len(),
            baselines.len()
        );
        if baselines.is_empty() && !driver_rows.is_empty() {
            warn!("expiration history is empty; every projection will be N/A");
        }

        driver_rows
            .iter()
            .map(|row| {
                let baseline = baselines.average(&row.property);
                match baseline {
                    Some(mean) => debug!(
                        "{:?}: baseline {} over {} billing rows",
                        row.property,
                        mean,
                        baselines.row_count(&row.property)
                    ),
                    None => warn!("no expiration history for {:?}", row.property),
                }
                DriverRow {
                    projected_renewal: project_row(row, baseline),
                    ..row.clone()
                }
            })
            .collect()
    }

    /// Edit path: set the proposed increase of row `index` from a percent
    /// entry, then re-derive every row's projection from its base rent
    pub fn apply_proposed_increase_edit(
        &self,
        rows: &[DriverRow],
        index: usize,
        new_rate_percent: f64,
    ) -> Result<Vec<DriverRow>> {
        if index >= rows.len() {
            return Err(RenewalError::RowOutOfRange {
                index,
                len: rows.len(),
            });
        }
        if !new_rate_percent.is_finite() {
            warn!(
                "non-finite increase entry for {:?}, storing 0",
                rows[index].property
            );
        }

        let mut updated = rows.to_vec();
        updated[index].proposed_increase = Some(percent_to_rate(new_rate_percent));

        for row in updated.iter_mut() {
            let base = self.edit_base(row);
            row.projected_renewal = project_row(row, Some(base));
        }

        Ok(updated)
    }
}

/// Batch path with the default configuration
pub fn batch_recompute_projections(
    driver_rows: &[DriverRow],
    expirations: &[ExpirationRow],
) -> Vec<DriverRow> {
    ProjectionEngine::default().recompute_from_history(driver_rows, expirations)
}

/// Edit path with the default configuration
pub fn apply_proposed_increase_edit(
    rows: &[DriverRow],
    index: usize,
    new_rate_percent: f64,
) -> Result<Vec<DriverRow>> {
    ProjectionEngine::default().apply_proposed_increase_edit(rows, index, new_rate_percent)
}
