//! Session context owning the mutable driver row set
//!
//! All mutation of the driver rows goes through this type. Every change runs
//! the full recompute chain (projection, metrics, increase series, then the
//! trend series of the selected property) before returning, so `&mut self`
//! serialises edits.

use crate::config::RenewalConfig;
use crate::error::{RenewalError, Result};
use crate::metrics::PortfolioMetrics;
use crate::projection::ProjectionEngine;
use crate::records::{DriverRow, RentSummaryRow};
use crate::series::{build_increase_by_property_series, build_renewal_trend_series, ChartSeries};
use crate::source::PortfolioSource;
use log::{info, warn};

/// Handle for an in-flight property selection
///
/// Only the ticket from the most recent [`Session::begin_selection`] can
/// complete; older ones are stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    property: String,
    generation: u64,
}

impl SelectionTicket {
    pub fn property(&self) -> &str {
        &self.property
    }
}

#[derive(Debug, Clone)]
struct Selection {
    property: String,
    summary: Option<RentSummaryRow>,
}

/// One user's working state for a portfolio
#[derive(Debug, Clone)]
pub struct Session {
    engine: ProjectionEngine,
    rows: Vec<DriverRow>,
    metrics: PortfolioMetrics,
    increase_series: ChartSeries,
    selection: Option<Selection>,
    trend: Option<ChartSeries>,
    generation: u64,
}

impl Session {
    pub fn new(config: RenewalConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
            rows: Vec::new(),
            metrics: PortfolioMetrics::default(),
            increase_series: ChartSeries::default(),
            selection: None,
            trend: None,
            generation: 0,
        }
    }

    /// Session seeded with rows
    pub fn with_rows(config: RenewalConfig, rows: Vec<DriverRow>) -> Self {
        let mut session = Self::new(config);
        session.replace_driver_rows(rows);
        session
    }

    pub fn config(&self) -> &RenewalConfig {
        self.engine.config()
    }

    pub fn rows(&self) -> &[DriverRow] {
        &self.rows
    }

    pub fn metrics(&self) -> &PortfolioMetrics {
        &self.metrics
    }

    pub fn increase_series(&self) -> &ChartSeries {
        &self.increase_series
    }

    /// Trend series of the selected property, once its summary has resolved
    pub fn trend_series(&self) -> Option<&ChartSeries> {
        self.trend.as_ref()
    }

    pub fn selected_property(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.property.as_str())
    }

    /// Replace the whole row set and rebuild everything derived from it
    pub fn replace_driver_rows(&mut self, rows: Vec<DriverRow>) {
        self.rows = rows;
        self.refresh();
    }

    /// Reload rows from the source; on failure the current rows stay
    pub fn reload(&mut self, source: &dyn PortfolioSource) -> Result<usize> {
        let rows = source.load_driver_rows().map_err(|e| {
            warn!("driver reload failed, keeping {} rows: {}", self.rows.len(), e);
            e
        })?;
        info!("session loaded {} driver rows", rows.len());
        let count = rows.len();
        self.replace_driver_rows(rows);
        Ok(count)
    }

    /// Batch path over the current rows using the source's expiration history
    pub fn recompute_from_history(&mut self, source: &dyn PortfolioSource) -> Result<()> {
        let expirations = source.load_expirations()?;
        let rows = self.engine.recompute_from_history(&self.rows, &expirations);
        self.replace_driver_rows(rows);
        Ok(())
    }

    /// Edit path: set row `index`'s proposed increase from a percent entry
    pub fn edit_proposed_increase(
        &mut self,
        index: usize,
        percent: f64,
    ) -> Result<&PortfolioMetrics> {
        let rows = self.engine.apply_proposed_increase_edit(&self.rows, index, percent)?;
        self.replace_driver_rows(rows);
        Ok(&self.metrics)
    }

    /// Start selecting a property, superseding any pending selection
    pub fn begin_selection(&mut self, property: &str) -> SelectionTicket {
        self.generation += 1;
        self.selection = Some(Selection {
            property: property.to_string(),
            summary: None,
        });
        self.trend = None;
        SelectionTicket {
            property: property.to_string(),
            generation: self.generation,
        }
    }

    /// Resolve a selection with the result of its rent summary fetch
    ///
    /// A superseded ticket changes nothing and returns `StaleSelection`. A
    /// fetch with no row returns `NotFound` and leaves no trend series.
    pub fn complete_selection(
        &mut self,
        ticket: SelectionTicket,
        fetched: Result<Option<RentSummaryRow>>,
    ) -> Result<&ChartSeries> {
        if ticket.generation != self.generation {
            warn!("dropping stale rent summary for {:?}", ticket.property);
            return Err(RenewalError::StaleSelection {
                property: ticket.property,
            });
        }

        let summary = fetched?.ok_or_else(|| RenewalError::NotFound {
            property: ticket.property.clone(),
        })?;

        let series = build_renewal_trend_series(
            &ticket.property,
            &summary,
            &self.rows,
            self.engine.config(),
        );
        self.selection = Some(Selection {
            property: ticket.property,
            summary: Some(summary),
        });
        let series: &ChartSeries = self.trend.insert(series);
        Ok(series)
    }

    /// Select a property and fetch its summary in one step
    pub fn select_property(
        &mut self,
        property: &str,
        source: &dyn PortfolioSource,
    ) -> Result<&ChartSeries> {
        let ticket = self.begin_selection(property);
        let fetched = source.load_rent_summary(property);
        self.complete_selection(ticket, fetched)
    }

    fn refresh(&mut self) {
        self.metrics = PortfolioMetrics::from_rows(&self.rows);
        self.increase_series = build_increase_by_property_series(&self.rows);
        if let Some(Selection {
            property,
            summary: Some(summary),
        }) = &self.selection
        {
            self.trend = Some(build_renewal_trend_series(
                property,
                summary,
                &self.rows,
                self.engine.config(),
            ));
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RenewalConfig::default())
    }
}
