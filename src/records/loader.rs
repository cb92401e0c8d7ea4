//! Load Driver, Expirations and Rent Summary tables from CSV exports
//!
//! Each table is one sheet of the source workbook saved as CSV, with the
//! sheet's own column headers.

use super::{DriverRow, ExpirationRow, ProjectedRenewal, RentSummaryRow};
use crate::error::Result;
use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder};
use log::{debug, warn};
use std::io::Read;

/// Header naming the join key in every table
pub const PROPERTY_COLUMN: &str = "Property";

/// Counts collected while loading a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

/// Raw CSV row matching the Driver sheet columns
#[derive(Debug, serde::Deserialize)]
struct DriverCsvRow {
    #[serde(rename = "Property")]
    property: Option<String>,
    #[serde(rename = "Standard Increase", default)]
    standard_increase: Option<String>,
    #[serde(rename = "Proposed Increase", default)]
    proposed_increase: Option<String>,
    #[serde(rename = "Base Rent", default)]
    base_rent: Option<String>,
    #[serde(rename = "Projected Renewal", default)]
    projected_renewal: Option<String>,
}

/// Parse a driver cell, warning when a non-blank value is not a number
fn parse_driver_cell(property: &str, column: &str, cell: Option<&str>) -> Option<f64> {
    let value = parse_number(cell);
    if value.is_none() && cell.is_some_and(|c| !c.trim().is_empty()) {
        warn!("{:?}: unparsable {} {:?}, treated as missing", property, column, cell);
    }
    value
}

impl DriverCsvRow {
    fn to_driver_row(self) -> Option<DriverRow> {
        let property = self.property?.trim().to_string();
        if property.is_empty() {
            return None;
        }

        Some(DriverRow {
            standard_increase: parse_driver_cell(
                &property,
                "Standard Increase",
                self.standard_increase.as_deref(),
            ),
            proposed_increase: parse_driver_cell(
                &property,
                "Proposed Increase",
                self.proposed_increase.as_deref(),
            ),
            base_rent: parse_driver_cell(&property, "Base Rent", self.base_rent.as_deref()),
            projected_renewal: self
                .projected_renewal
                .as_deref()
                .map(ProjectedRenewal::parse)
                .unwrap_or_default(),
            property,
        })
    }
}

/// Raw CSV row matching the Expirations sheet columns
#[derive(Debug, serde::Deserialize)]
struct ExpirationCsvRow {
    #[serde(rename = "Property")]
    property: Option<String>,
    #[serde(rename = "Scheduled Charges")]
    scheduled_charges: Option<String>,
}

/// Parse a numeric cell, tolerating blanks, whitespace, thousands separators
/// and E-notation; non-finite values (`NaN`, `inf`) are rejected
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() {
        return None;
    }
    cell.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Reader that accepts ragged rows; missing trailing cells read as blank
fn table_reader<R: Read>(reader: R) -> Reader<R> {
    ReaderBuilder::new().flexible(true).from_reader(reader)
}

/// Load driver rows from any reader
///
/// Rows without a property, or that cannot be read at all, are skipped,
/// counted and logged.
pub fn load_driver_rows_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<DriverRow>, LoadReport)> {
    let mut csv_reader = table_reader(reader);
    let mut rows = Vec::new();
    let mut report = LoadReport::default();

    for result in csv_reader.deserialize::<DriverCsvRow>() {
        report.total_rows += 1;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("driver row {} unreadable, skipped: {}", report.total_rows, e);
                report.skipped_rows += 1;
                continue;
            }
        };
        match raw.to_driver_row() {
            Some(row) => rows.push(row),
            None => {
                warn!("driver row {} has no property, skipped", report.total_rows);
                report.skipped_rows += 1;
            }
        }
    }

    report.loaded_rows = rows.len();
    debug!("loaded {} driver rows", rows.len());
    Ok((rows, report))
}

/// Load expiration rows from any reader
///
/// Unreadable rows and rows with no property or an unparsable charge are
/// skipped and counted.
pub fn load_expirations_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<ExpirationRow>, LoadReport)> {
    let mut csv_reader = table_reader(reader);
    let mut rows = Vec::new();
    let mut report = LoadReport::default();

    for result in csv_reader.deserialize::<ExpirationCsvRow>() {
        report.total_rows += 1;
        let Ok(raw) = result else {
            report.skipped_rows += 1;
            continue;
        };

        let property = raw.property.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        let charge = parse_number(raw.scheduled_charges.as_deref());
        match (property, charge) {
            (Some(property), Some(scheduled_charge)) => rows.push(ExpirationRow {
                property,
                scheduled_charge,
            }),
            _ => report.skipped_rows += 1,
        }
    }

    if report.skipped_rows > 0 {
        warn!("skipped {} of {} expiration rows", report.skipped_rows, report.total_rows);
    }
    report.loaded_rows = rows.len();
    Ok((rows, report))
}

/// Load rent summary rows from any reader
///
/// Every column other than `Property` is a month; blank or non-numeric cells
/// leave that month absent, as do cells missing from a short row. Also returns
/// the header row for month detection.
pub fn load_rent_summaries_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<RentSummaryRow>, Vec<String>)> {
    let mut csv_reader = table_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let key_index = headers.iter().position(|h| h == PROPERTY_COLUMN);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("unreadable rent summary row skipped: {}", e);
                continue;
            }
        };
        let property = key_index
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or_default();
        if property.is_empty() {
            continue;
        }

        let mut row = RentSummaryRow::new(property);
        for (i, header) in headers.iter().enumerate() {
            if Some(i) == key_index {
                continue;
            }
            if let Some(value) = parse_number(record.get(i)) {
                row.months.insert(header.clone(), value);
            }
        }
        rows.push(row);
    }

    Ok((rows, headers))
}

/// Parse a `Mon-YY` month label such as `Jan-24`
pub fn parse_month_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("01-{}", label.trim()), "%d-%b-%y").ok()
}

/// Pick the month columns out of a header row, ordered chronologically
pub fn month_labels_from_headers(headers: &[String]) -> Vec<String> {
    let mut months: Vec<(NaiveDate, &String)> = headers
        .iter()
        .filter_map(|h| parse_month_label(h).map(|date| (date, h)))
        .collect();
    months.sort_by_key(|(date, _)| *date);
    months.into_iter().map(|(_, h)| h.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVER_CSV: &str = "\
Property,Standard Increase,Proposed Increase,Base Rent,Projected Renewal
Tower A,0.05,,1000,
Tower B,0.03,0,\"1,250\",N/A
,0.04,,,
Tower C,,0.02,,2040
";

    #[test]
    fn test_load_driver_rows() {
        let (rows, report) = load_driver_rows_from_reader(DRIVER_CSV.as_bytes()).unwrap();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].property, "Tower A");
        assert_eq!(rows[0].standard_increase, Some(0.05));
        assert_eq!(rows[0].proposed_increase, None);
        assert_eq!(rows[0].base_rent, Some(1000.0));
        assert_eq!(rows[0].projected_renewal, ProjectedRenewal::NotAvailable);

        // Zero override survives loading
        assert_eq!(rows[1].proposed_increase, Some(0.0));
        assert_eq!(rows[1].base_rent, Some(1250.0));

        assert_eq!(rows[2].standard_increase, None);
        assert_eq!(rows[2].projected_renewal, ProjectedRenewal::Value(2040.0));
    }

    #[test]
    fn test_load_expirations_skips_bad_charges() {
        let csv = "Property,Scheduled Charges\nP,100\nP,200\nQ,abc\nQ,50\n,10\n";
        let (rows, report) = load_expirations_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(report.skipped_rows, 2);
        assert_eq!(rows[2], ExpirationRow::new("Q", 50.0));
    }

    #[test]
    fn test_e_notation_cells_parse() {
        let csv = "Property,Standard Increase,Proposed Increase,Base Rent\nA,5E-2,,1.2e3\n";
        let (rows, report) = load_driver_rows_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(report.skipped_rows, 0);
        assert_eq!(rows[0].standard_increase, Some(0.05));
        assert_eq!(rows[0].base_rent, Some(1200.0));

        let csv = "Property,Scheduled Charges\nP,1.5E+3\nP,100\n";
        let (rows, report) = load_expirations_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(report.loaded_rows, 2);
        assert_eq!(rows[0].scheduled_charge, 1500.0);
    }

    #[test]
    fn test_non_finite_cells_are_missing() {
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(Some("inf")), None);
        assert_eq!(parse_number(Some("N/A")), None);
        assert_eq!(parse_number(Some(" 1,250.5 ")), Some(1250.5));
    }

    #[test]
    fn test_ragged_rows_do_not_block_the_table() {
        let csv = "Property,Scheduled Charges\nP,100\nQ,50,extra\nR,10\nS\n";
        let (rows, report) = load_expirations_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.skipped_rows, 1);
        let properties: Vec<&str> = rows.iter().map(|r| r.property.as_str()).collect();
        assert_eq!(properties, vec!["P", "Q", "R"]);

        let csv = "Property,Standard Increase,Base Rent\nA,0.03\nB,0.04,900,stray\n";
        let (rows, report) = load_driver_rows_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(report.loaded_rows, 2);
        assert_eq!(rows[0].base_rent, None);
        assert_eq!(rows[1].base_rent, Some(900.0));

        let csv = "Property,Jan-24,Feb-24\nA,900\nB,800,810,820\n";
        let (rows, _) = load_rent_summaries_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month("Feb-24"), None);
        assert_eq!(rows[1].month("Feb-24"), Some(810.0));
    }

    #[test]
    fn test_load_rent_summaries() {
        let csv = "Property,Jan-24,Feb-24,Mar-24\nA,900,910,\nB,800,,820\n";
        let (rows, headers) = load_rent_summaries_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(headers.len(), 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month("Feb-24"), Some(910.0));
        assert_eq!(rows[0].month("Mar-24"), None);
        assert_eq!(rows[1].month("Feb-24"), None);
        assert_eq!(rows[1].month("Mar-24"), Some(820.0));
    }

    #[test]
    fn test_month_labels_ordered_chronologically() {
        let headers: Vec<String> = ["Property", "Feb-24", "Dec-23", "Jan-24", "Notes"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(month_labels_from_headers(&headers), vec!["Dec-23", "Jan-24", "Feb-24"]);
        assert!(parse_month_label("Property").is_none());
    }
}
