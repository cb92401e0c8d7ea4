//! Effective increase rate selection

use crate::error::{RenewalError, Result};
use crate::records::DriverRow;

/// Effective rate for a row: the proposed override if present, else the
/// standard increase.
///
/// A proposed increase of exactly `0.0` is an override and wins. A row with
/// neither rate is reported as [`RenewalError::MissingIncrease`].
pub fn resolve_increase(row: &DriverRow) -> Result<f64> {
    row.proposed_increase
        .or(row.standard_increase)
        .ok_or_else(|| RenewalError::MissingIncrease {
            property: row.property.clone(),
        })
}

/// Convert a percent entry (e.g. `10` for 10%) to a fractional rate
///
/// Non-finite entries become `0.0`, the same value an unparsable edit field
/// has always produced.
pub fn percent_to_rate(percent: f64) -> f64 {
    if percent.is_finite() {
        percent / 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposed_overrides_standard() {
        let row = DriverRow::new("A", 0.05).with_proposed_increase(0.10);
        assert_eq!(resolve_increase(&row).unwrap(), 0.10);
    }

    #[test]
    fn test_zero_proposed_is_honored() {
        let row = DriverRow::new("A", 0.05).with_proposed_increase(0.0);
        assert_eq!(resolve_increase(&row).unwrap(), 0.0);
    }

    #[test]
    fn test_falls_back_to_standard() {
        let row = DriverRow::new("A", 0.05);
        assert_eq!(resolve_increase(&row).unwrap(), 0.05);
    }

    #[test]
    fn test_missing_both_is_reported() {
        let mut row = DriverRow::new("A", 0.05);
        row.standard_increase = None;

        match resolve_increase(&row) {
            Err(RenewalError::MissingIncrease { property }) => assert_eq!(property, "A"),
            other => panic!("expected MissingIncrease, got {:?}", other),
        }
    }

    #[test]
    fn test_percent_to_rate() {
        assert_eq!(percent_to_rate(10.0), 0.10);
        assert_eq!(percent_to_rate(0.0), 0.0);
        assert_eq!(percent_to_rate(f64::NAN), 0.0);
    }
}
