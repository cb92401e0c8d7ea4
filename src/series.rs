//! Chart series for the renewal trend line and the increase-by-property bars

use crate::config::RenewalConfig;
use crate::error::{RenewalError, Result};
use crate::records::{DriverRow, RentSummaryRow};
use serde::{Deserialize, Serialize};

/// Label of the increase-by-property dataset
pub const STANDARD_INCREASE_LABEL: &str = "Standard Increase";

/// One named run of values; `None` is a gap, not a zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Labels plus datasets of the same length, ready for rendering
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    /// Every dataset has one value per label
    pub fn is_aligned(&self) -> bool {
        self.datasets.iter().all(|d| d.values.len() == self.labels.len())
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Last driver row for a property (last-write-wins on duplicates)
pub fn find_driver_row<'a>(rows: &'a [DriverRow], property: &str) -> Option<&'a DriverRow> {
    rows.iter().rev().find(|r| r.property == property)
}

/// Monthly history for one property followed by its projected renewal
///
/// Months come from `config.month_labels` in that order. Missing months and
/// an `N/A` projection become gaps. A property with no driver row still gets
/// a trailing gap so the dataset matches the labels.
pub fn build_renewal_trend_series(
    property: &str,
    rent_summary: &RentSummaryRow,
    driver_rows: &[DriverRow],
    config: &RenewalConfig,
) -> ChartSeries {
    let mut labels = config.month_labels.clone();
    labels.push(config.projected_label.clone());

    let mut values: Vec<Option<f64>> = config
        .month_labels
        .iter()
        .map(|month| rent_summary.month(month))
        .collect();
    values.push(finite(
        find_driver_row(driver_rows, property).and_then(|r| r.projected_renewal.value()),
    ));

    ChartSeries {
        labels,
        datasets: vec![Dataset {
            label: format!("{} Rent Data", property),
            values,
        }],
    }
}

/// Trend series for a lookup result, surfacing a miss as `NotFound`
pub fn renewal_trend_for(
    property: &str,
    rent_summary: Option<&RentSummaryRow>,
    driver_rows: &[DriverRow],
    config: &RenewalConfig,
) -> Result<ChartSeries> {
    let summary = rent_summary.ok_or_else(|| RenewalError::NotFound {
        property: property.to_string(),
    })?;
    Ok(build_renewal_trend_series(property, summary, driver_rows, config))
}

/// One bar per driver row: standard increase as a percentage
///
/// Depends only on the rows, never on which property is selected.
pub fn build_increase_by_property_series(driver_rows: &[DriverRow]) -> ChartSeries {
    ChartSeries {
        labels: driver_rows.iter().map(|r| r.property.clone()).collect(),
        datasets: vec![Dataset {
            label: STANDARD_INCREASE_LABEL.to_string(),
            values: driver_rows
                .iter()
                .map(|r| finite(r.standard_increase).map(|rate| rate * 100.0))
                .collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ProjectedRenewal;
    use approx::assert_relative_eq;

    fn summary() -> RentSummaryRow {
        RentSummaryRow::new("A")
            .with_month("Jan-24", 900.0)
            .with_month("Feb-24", 910.0)
            .with_month("Mar-24", 920.0)
            .with_month("May-24", f64::NAN)
            .with_month("Jun-24", 950.0)
    }

    #[test]
    fn test_trend_series_layout() {
        let rows = vec![DriverRow {
            projected_renewal: ProjectedRenewal::Value(1100.0),
            ..DriverRow::new("A", 0.05)
        }];
        let series = build_renewal_trend_series("A", &summary(), &rows, &RenewalConfig::default());

        assert_eq!(series.labels.len(), 7);
        assert_eq!(series.labels[6], "Projected Renewal");
        assert!(series.is_aligned());

        let data = &series.datasets[0];
        assert_eq!(data.label, "A Rent Data");
        assert_eq!(
            data.values,
            vec![Some(900.0), Some(910.0), Some(920.0), None, None, Some(950.0), Some(1100.0)]
        );
    }

    #[test]
    fn test_trend_not_available_projection_is_gap() {
        let rows = vec![DriverRow::new("A", 0.05)];
        let series = build_renewal_trend_series("A", &summary(), &rows, &RenewalConfig::default());

        assert_eq!(series.datasets[0].values.last(), Some(&None));
    }

    #[test]
    fn test_trend_without_driver_row_stays_aligned() {
        let series = build_renewal_trend_series("A", &summary(), &[], &RenewalConfig::default());

        assert!(series.is_aligned());
        assert_eq!(series.datasets[0].values[6], None);
    }

    #[test]
    fn test_trend_uses_last_duplicate_row() {
        let rows = vec![
            DriverRow {
                projected_renewal: ProjectedRenewal::Value(1.0),
                ..DriverRow::new("A", 0.05)
            },
            DriverRow {
                projected_renewal: ProjectedRenewal::Value(2.0),
                ..DriverRow::new("A", 0.05)
            },
        ];
        let series = build_renewal_trend_series("A", &summary(), &rows, &RenewalConfig::default());

        assert_eq!(series.datasets[0].values[6], Some(2.0));
    }

    #[test]
    fn test_missing_summary_is_not_found() {
        let result = renewal_trend_for("B", None, &[], &RenewalConfig::default());
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_increase_by_property_series() {
        let mut missing = DriverRow::new("C", 0.0);
        missing.standard_increase = None;
        let rows = vec![DriverRow::new("A", 0.03), DriverRow::new("B", 0.05), missing];

        let series = build_increase_by_property_series(&rows);

        assert_eq!(series.labels, vec!["A", "B", "C"]);
        assert!(series.is_aligned());
        let values = &series.datasets[0].values;
        assert_relative_eq!(values[0].unwrap(), 3.0);
        assert_relative_eq!(values[1].unwrap(), 5.0);
        assert_eq!(values[2], None);
    }
}
