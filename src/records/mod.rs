//! Record model and table loading

mod data;
pub mod loader;

pub use data::{DriverRow, ExpirationRow, ProjectedRenewal, RentSummaryRow, NOT_AVAILABLE};
pub use loader::{
    load_driver_rows_from_reader, load_expirations_from_reader, load_rent_summaries_from_reader,
    month_labels_from_headers, LoadReport,
};
