//! Record shapes matching the Driver, Expirations and Rent Summary tables

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Text written in place of a projection that could not be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Derived renewal value for a property
///
/// `NotAvailable` is a gap, never a zero: metrics skip it and chart series map
/// it to `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProjectedRenewal {
    Value(f64),
    #[default]
    NotAvailable,
}

impl ProjectedRenewal {
    /// Wrap a computed amount, collapsing non-finite results to `NotAvailable`
    pub fn from_amount(amount: f64) -> Self {
        if amount.is_finite() {
            ProjectedRenewal::Value(amount)
        } else {
            ProjectedRenewal::NotAvailable
        }
    }

    /// Parse a cell as written by a spreadsheet export
    pub fn parse(text: &str) -> Self {
        text.trim()
            .parse::<f64>()
            .map(Self::from_amount)
            .unwrap_or(ProjectedRenewal::NotAvailable)
    }

    /// Finite value, if any
    pub fn value(&self) -> Option<f64> {
        match *self {
            ProjectedRenewal::Value(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.value().is_some()
    }
}

impl fmt::Display for ProjectedRenewal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{:.2}", v),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for ProjectedRenewal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for ProjectedRenewal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Text(String),
            Missing(()),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Number(v) => ProjectedRenewal::from_amount(v),
            Wire::Text(s) => ProjectedRenewal::parse(&s),
            Wire::Missing(()) => ProjectedRenewal::NotAvailable,
        })
    }
}

/// One leased property's increase assumptions and derived projection
///
/// `property` is the join key against expiration and rent summary rows. When
/// a data set repeats a property, lookups by key resolve to the last row
/// (last-write-wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRow {
    #[serde(rename = "Property")]
    pub property: String,

    /// Default renewal rate as a fraction (0.03 = 3%)
    #[serde(rename = "Standard Increase", default)]
    pub standard_increase: Option<f64>,

    /// User override rate as a fraction; `Some(0.0)` is a real override
    #[serde(
        rename = "Proposed Increase",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub proposed_increase: Option<f64>,

    /// Base used by the interactive edit path
    #[serde(rename = "Base Rent", default, skip_serializing_if = "Option::is_none")]
    pub base_rent: Option<f64>,

    /// Derived, never authoritative input
    #[serde(rename = "Projected Renewal", default)]
    pub projected_renewal: ProjectedRenewal,
}

impl DriverRow {
    /// Create a row with a standard increase and nothing derived yet
    pub fn new(property: impl Into<String>, standard_increase: f64) -> Self {
        Self {
            property: property.into(),
            standard_increase: Some(standard_increase),
            proposed_increase: None,
            base_rent: None,
            projected_renewal: ProjectedRenewal::NotAvailable,
        }
    }

    pub fn with_base_rent(mut self, base_rent: f64) -> Self {
        self.base_rent = Some(base_rent);
        self
    }

    pub fn with_proposed_increase(mut self, rate: f64) -> Self {
        self.proposed_increase = Some(rate);
        self
    }
}

/// One historical lease/billing event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationRow {
    #[serde(rename = "Property")]
    pub property: String,

    #[serde(rename = "Scheduled Charges")]
    pub scheduled_charge: f64,
}

impl ExpirationRow {
    pub fn new(property: impl Into<String>, scheduled_charge: f64) -> Self {
        Self {
            property: property.into(),
            scheduled_charge,
        }
    }
}

/// Named monthly rent values for one property
///
/// Months with no value are simply absent from `months`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RentSummaryRow {
    #[serde(rename = "Property")]
    pub property: String,

    #[serde(flatten, deserialize_with = "deserialize_months")]
    pub months: HashMap<String, f64>,
}

/// Keep numeric (or numeric-text) months; nulls and other columns are dropped
fn deserialize_months<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let cells = HashMap::<String, Cell>::deserialize(deserializer)?;
    Ok(cells
        .into_iter()
        .filter_map(|(label, cell)| {
            let value = match cell {
                Cell::Number(v) => Some(v),
                Cell::Text(s) => s.trim().parse::<f64>().ok(),
                Cell::Other(_) => None,
            };
            value.filter(|v| v.is_finite()).map(|v| (label, v))
        })
        .collect())
}

impl RentSummaryRow {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            months: HashMap::new(),
        }
    }

    pub fn with_month(mut self, label: impl Into<String>, value: f64) -> Self {
        self.months.insert(label.into(), value);
        self
    }

    /// Value for a month label, if present and finite
    pub fn month(&self, label: &str) -> Option<f64> {
        self.months.get(label).copied().filter(|v| v.is_finite())
    }
}
