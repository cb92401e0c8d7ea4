//! Portfolio-wide summary metrics

use crate::records::DriverRow;
use serde::{Deserialize, Serialize};

/// Dataset-wide averages, recomputed wholesale from the driver rows
///
/// `None` means there was nothing to average; it is never a NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Mean standard increase, as a percentage (3.0 = 3%)
    pub average_standard_increase: Option<f64>,

    /// Mean projected renewal over rows with an available projection
    pub average_projected_renewal: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

impl PortfolioMetrics {
    /// Compute both averages from the current rows
    ///
    /// Rows without a finite standard increase are left out of the first
    /// average; `N/A` projections are left out of the second.
    pub fn from_rows(rows: &[DriverRow]) -> Self {
        let average_standard_increase = mean(
            rows.iter()
                .filter_map(|r| r.standard_increase)
                .filter(|v| v.is_finite()),
        )
        .map(|rate| rate * 100.0);

        let average_projected_renewal =
            mean(rows.iter().filter_map(|r| r.projected_renewal.value()));

        Self {
            average_standard_increase,
            average_projected_renewal,
        }
    }
}

pub fn compute_portfolio_metrics(rows: &[DriverRow]) -> PortfolioMetrics {
    PortfolioMetrics::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ProjectedRenewal;
    use approx::assert_relative_eq;

    fn projected(property: &str, rate: f64, value: ProjectedRenewal) -> DriverRow {
        DriverRow {
            projected_renewal: value,
            ..DriverRow::new(property, rate)
        }
    }

    #[test]
    fn test_empty_rows_are_undefined() {
        let metrics = compute_portfolio_metrics(&[]);
        assert_eq!(metrics.average_standard_increase, None);
        assert_eq!(metrics.average_projected_renewal, None);
    }

    #[test]
    fn test_averages() {
        let rows = vec![
            projected("A", 0.02, ProjectedRenewal::Value(1000.0)),
            projected("B", 0.04, ProjectedRenewal::Value(2000.0)),
        ];
        let metrics = compute_portfolio_metrics(&rows);

        assert_relative_eq!(metrics.average_standard_increase.unwrap(), 3.0);
        assert_relative_eq!(metrics.average_projected_renewal.unwrap(), 1500.0);
    }

    #[test]
    fn test_not_available_excluded_from_sum_and_count() {
        let rows = vec![
            projected("A", 0.03, ProjectedRenewal::Value(1000.0)),
            projected("B", 0.03, ProjectedRenewal::NotAvailable),
            projected("C", 0.03, ProjectedRenewal::Value(3000.0)),
        ];
        let metrics = compute_portfolio_metrics(&rows);

        assert_relative_eq!(metrics.average_projected_renewal.unwrap(), 2000.0);
    }

    #[test]
    fn test_all_not_available_is_undefined() {
        let rows = vec![projected("A", 0.03, ProjectedRenewal::NotAvailable)];
        let metrics = compute_portfolio_metrics(&rows);

        assert_relative_eq!(metrics.average_standard_increase.unwrap(), 3.0);
        assert_eq!(metrics.average_projected_renewal, None);
    }

    #[test]
    fn test_serializes_undefined_as_null() {
        let json = serde_json::to_value(PortfolioMetrics::default()).unwrap();
        assert!(json["average_standard_increase"].is_null());
    }
}
