//! Historical baseline: mean scheduled charge per property

use crate::records::ExpirationRow;
use std::collections::HashMap;

/// Mean of `scheduled_charge` over the rows for `property`
///
/// Returns `None` when no row matches, never a zero or NaN.
pub fn average_scheduled_charge(expirations: &[ExpirationRow], property: &str) -> Option<f64> {
    let (sum, count) = expirations
        .iter()
        .filter(|e| e.property == property)
        .fold((0.0, 0usize), |(sum, count), e| (sum + e.scheduled_charge, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Baselines for every property, built in one pass over the expirations
#[derive(Debug, Clone, Default)]
pub struct BaselineIndex {
    totals: HashMap<String, (f64, usize)>,
}

impl BaselineIndex {
    pub fn from_expirations(expirations: &[ExpirationRow]) -> Self {
        let mut totals: HashMap<String, (f64, usize)> = HashMap::new();
        for e in expirations {
            let entry = totals.entry(e.property.clone()).or_insert((0.0, 0));
            entry.0 += e.scheduled_charge;
            entry.1 += 1;
        }
        Self { totals }
    }

    /// Same contract as [`average_scheduled_charge`]
    pub fn average(&self, property: &str) -> Option<f64> {
        self.totals
            .get(property)
            .filter(|(_, count)| *count > 0)
            .map(|(sum, count)| sum / *count as f64)
    }

    /// Number of billing rows seen for a property
    pub fn row_count(&self, property: &str) -> usize {
        self.totals.get(property).map(|(_, count)| *count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
