//! Renewal Projection CLI
//!
//! Command-line interface for projecting renewals from exported portfolio tables

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use renewal_projection::{
    ChartSeries, CsvPortfolio, DriverRow, PortfolioMetrics, RenewalConfig, Session,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "renewal_projection",
    version,
    about = "Project rent renewals for a property portfolio"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Directory holding driver.csv, expirations.csv and rent_summary.csv
    #[arg(long, default_value = renewal_projection::source::DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recompute every projection from expiration history
    Project {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Apply one proposed increase edit (percent) and recompute
    Edit {
        #[command(flatten)]
        common: CommonArgs,
        /// Row index in the driver table (0-based)
        #[arg(long)]
        index: usize,
        /// New proposed increase as a percentage, e.g. 10 for 10%
        #[arg(long, allow_negative_numbers = true)]
        percent: f64,
    },
    /// Renewal trend series for one property
    Trend {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        property: String,
        /// Take month columns from the rent summary header instead of the config
        #[arg(long)]
        detect_months: bool,
    },
    /// Standard increase per property
    Increases {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Serialize)]
struct RowsOutput<'a> {
    rows: &'a [DriverRow],
    metrics: &'a PortfolioMetrics,
}

fn load_config(common: &CommonArgs) -> Result<RenewalConfig> {
    match &common.config {
        Some(path) => RenewalConfig::from_json_path(path)
            .with_context(|| format!("failed to read config {}", path.display())),
        None => Ok(RenewalConfig::default()),
    }
}

fn open_session(common: &CommonArgs, config: RenewalConfig) -> Result<(Session, CsvPortfolio)> {
    let source = CsvPortfolio::new(&common.data_dir);
    let mut session = Session::new(config);
    session
        .reload(&source)
        .with_context(|| format!("failed to load driver rows from {}", source.dir().display()))?;
    Ok((session, source))
}

fn format_optional(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{:.2}{}", v, suffix))
        .unwrap_or_else(|| "-".to_string())
}

fn print_rows(session: &Session, json: bool) -> Result<()> {
    if json {
        let output = RowsOutput {
            rows: session.rows(),
            metrics: session.metrics(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{:>4} {:<30} {:>10} {:>10} {:>14}",
        "Row", "Property", "Standard", "Proposed", "Projected"
    );
    println!("{}", "-".repeat(72));
    for (i, row) in session.rows().iter().enumerate() {
        println!(
            "{:>4} {:<30} {:>10} {:>10} {:>14}",
            i,
            row.property,
            format_optional(row.standard_increase.map(|r| r * 100.0), "%"),
            format_optional(row.proposed_increase.map(|r| r * 100.0), "%"),
            row.projected_renewal.to_string(),
        );
    }

    let metrics = session.metrics();
    println!("\nSummary:");
    println!(
        "  Average Standard Increase: {}",
        format_optional(metrics.average_standard_increase, "%")
    );
    println!(
        "  Average Projected Renewal: {}",
        format_optional(metrics.average_projected_renewal, "")
    );
    Ok(())
}

fn print_series(series: &ChartSeries, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(series)?);
        return Ok(());
    }

    for dataset in &series.datasets {
        println!("{}", dataset.label);
        println!("{}", "-".repeat(40));
        for (label, value) in series.labels.iter().zip(&dataset.values) {
            println!("  {:<24} {:>12}", label, format_optional(*value, ""));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Project { common } => {
            let (mut session, source) = open_session(&common, load_config(&common)?)?;
            session
                .recompute_from_history(&source)
                .context("failed to load expiration history")?;
            print_rows(&session, common.json)
        }
        Command::Edit { common, index, percent } => {
            let (mut session, _) = open_session(&common, load_config(&common)?)?;
            session.edit_proposed_increase(index, percent)?;
            print_rows(&session, common.json)
        }
        Command::Trend { common, property, detect_months } => {
            let mut config = load_config(&common)?;
            if detect_months {
                let (_, months) = CsvPortfolio::new(&common.data_dir).load_rent_summaries()?;
                if months.is_empty() {
                    bail!("no month columns found in rent summary header");
                }
                config = config.with_month_labels(months);
            }

            let (mut session, source) = open_session(&common, config)?;
            match session.select_property(&property, &source) {
                Ok(series) => print_series(series, common.json),
                Err(e) if e.is_not_found() => bail!("Property not found: {}", property),
                Err(e) => Err(e.into()),
            }
        }
        Command::Increases { common } => {
            let (session, _) = open_session(&common, load_config(&common)?)?;
            print_series(session.increase_series(), common.json)
        }
    }
}
