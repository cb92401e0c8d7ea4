//! Ingestion boundary: where driver, expiration and rent summary rows come from

use crate::error::Result;
use crate::records::{
    load_driver_rows_from_reader, load_expirations_from_reader, load_rent_summaries_from_reader,
    month_labels_from_headers, DriverRow, ExpirationRow, RentSummaryRow,
};
use log::info;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default directory holding the exported tables
pub const DEFAULT_DATA_PATH: &str = "data";

pub const DRIVER_FILE: &str = "driver.csv";
pub const EXPIRATIONS_FILE: &str = "expirations.csv";
pub const RENT_SUMMARY_FILE: &str = "rent_summary.csv";

/// Supplier of the three portfolio tables
///
/// `load_rent_summary` returns `Ok(None)` for a property with no row; an
/// `Err` is a transport or parse failure.
pub trait PortfolioSource {
    fn load_driver_rows(&self) -> Result<Vec<DriverRow>>;
    fn load_expirations(&self) -> Result<Vec<ExpirationRow>>;
    fn load_rent_summary(&self, property: &str) -> Result<Option<RentSummaryRow>>;
}

/// Tables exported as CSV files into one directory
#[derive(Debug, Clone)]
pub struct CsvPortfolio {
    dir: PathBuf,
}

impl CsvPortfolio {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn open(&self, name: &str) -> Result<File> {
        Ok(File::open(self.dir.join(name))?)
    }

    /// Every rent summary row plus the detected month columns
    pub fn load_rent_summaries(&self) -> Result<(Vec<RentSummaryRow>, Vec<String>)> {
        let (rows, headers) = load_rent_summaries_from_reader(self.open(RENT_SUMMARY_FILE)?)?;
        Ok((rows, month_labels_from_headers(&headers)))
    }
}

impl Default for CsvPortfolio {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

impl PortfolioSource for CsvPortfolio {
    fn load_driver_rows(&self) -> Result<Vec<DriverRow>> {
        let (rows, report) = load_driver_rows_from_reader(self.open(DRIVER_FILE)?)?;
        info!(
            "loaded {} driver rows from {} ({} skipped)",
            report.loaded_rows,
            self.dir.display(),
            report.skipped_rows
        );
        Ok(rows)
    }

    fn load_expirations(&self) -> Result<Vec<ExpirationRow>> {
        let (rows, report) = load_expirations_from_reader(self.open(EXPIRATIONS_FILE)?)?;
        info!(
            "loaded {} expiration rows ({} skipped)",
            report.loaded_rows, report.skipped_rows
        );
        Ok(rows)
    }

    fn load_rent_summary(&self, property: &str) -> Result<Option<RentSummaryRow>> {
        let (rows, _) = load_rent_summaries_from_reader(self.open(RENT_SUMMARY_FILE)?)?;
        Ok(rows.into_iter().rev().find(|r| r.property == property))
    }
}

/// Tables held in memory, keyed rent summaries last-write-wins
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortfolio {
    pub driver_rows: Vec<DriverRow>,
    pub expirations: Vec<ExpirationRow>,
    pub rent_summaries: HashMap<String, RentSummaryRow>,
}

impl InMemoryPortfolio {
    pub fn new(driver_rows: Vec<DriverRow>, expirations: Vec<ExpirationRow>) -> Self {
        Self {
            driver_rows,
            expirations,
            rent_summaries: HashMap::new(),
        }
    }

    pub fn with_rent_summary(mut self, row: RentSummaryRow) -> Self {
        self.rent_summaries.insert(row.property.clone(), row);
        self
    }
}

impl PortfolioSource for InMemoryPortfolio {
    fn load_driver_rows(&self) -> Result<Vec<DriverRow>> {
        Ok(self.driver_rows.clone())
    }

    fn load_expirations(&self) -> Result<Vec<ExpirationRow>> {
        Ok(self.expirations.clone())
    }

    fn load_rent_summary(&self, property: &str) -> Result<Option<RentSummaryRow>> {
        Ok(self.rent_summaries.get(property).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_an_error() {
        let source = CsvPortfolio::new("does/not/exist");
        assert!(source.load_driver_rows().is_err());
        assert!(source.load_rent_summary("A").is_err());
    }

    #[test]
    fn test_in_memory_lookup() {
        let source = InMemoryPortfolio::default()
            .with_rent_summary(RentSummaryRow::new("A").with_month("Jan-24", 1.0));

        assert!(source.load_rent_summary("A").unwrap().is_some());
        assert!(source.load_rent_summary("B").unwrap().is_none());
    }
}
