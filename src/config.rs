//! Engine configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Base rent used by the edit path when a row carries no `Base Rent`
pub const DEFAULT_BASE_RENT: f64 = 1000.0;

/// Trailing label of the renewal trend series
pub const DEFAULT_PROJECTED_LABEL: &str = "Projected Renewal";

/// Month columns of the rent summary table, in chart order
pub const DEFAULT_MONTH_LABELS: [&str; 6] =
    ["Jan-24", "Feb-24", "Mar-24", "Apr-24", "May-24", "Jun-24"];

fn default_base_rent() -> f64 { DEFAULT_BASE_RENT }
fn default_month_labels() -> Vec<String> {
    DEFAULT_MONTH_LABELS.iter().map(|m| m.to_string()).collect()
}
fn default_projected_label() -> String { DEFAULT_PROJECTED_LABEL.to_string() }

/// Configuration shared by the projection paths and series builders
///
/// Every field is optional in a config file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalConfig {
    /// Fallback base for the edit path (see [`DEFAULT_BASE_RENT`])
    #[serde(default = "default_base_rent")]
    pub default_base_rent: f64,

    /// Ordered month identifiers plotted before the projected point
    #[serde(default = "default_month_labels")]
    pub month_labels: Vec<String>,

    /// Label of the projected point
    #[serde(default = "default_projected_label")]
    pub projected_label: String,
}

impl Default for RenewalConfig {
    fn default() -> Self {
        Self {
            default_base_rent: default_base_rent(),
            month_labels: default_month_labels(),
            projected_label: default_projected_label(),
        }
    }
}

impl RenewalConfig {
    /// Load a JSON config file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Replace the month labels, e.g. with ones detected from a table header
    pub fn with_month_labels(mut self, labels: Vec<String>) -> Self {
        self.month_labels = labels;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RenewalConfig = serde_json::from_str(r#"{"default_base_rent": 1500}"#).unwrap();

        assert_eq!(config.default_base_rent, 1500.0);
        assert_eq!(config.month_labels.len(), 6);
        assert_eq!(config.month_labels[0], "Jan-24");
        assert_eq!(config.projected_label, "Projected Renewal");
    }

    #[test]
    fn test_empty_config_matches_default() {
        let config: RenewalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RenewalConfig::default());
    }
}
