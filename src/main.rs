//! House Price EDA - Housing price time series exploration
//!
//! Loads a wide monthly house-price CSV, reshapes it to one row per
//! city and month, prints a correlation table and a data sample, and
//! writes a price histogram and a top-cities bar chart as PNG.

mod charts;
mod config;
mod data;
mod pipeline;
mod report;
mod stats;

use anyhow::Result;
use clap::Parser;
use config::{AnalysisConfig, DEFAULT_INPUT, DEFAULT_OUT_DIR};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "house-price-eda",
    about = "Explore a wide monthly house-price CSV: correlation, distribution, top cities"
)]
struct Cli {
    /// CSV with RegionID, RegionType, RegionName, StateName, SizeRank and one column per month.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory the charts and summary.json are written to.
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the tables.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AnalysisConfig::new(cli.input, cli.out_dir);
    info!(input = %config.input.display(), out_dir = %config.out_dir.display(), "startup");

    let summary = pipeline::run(&config)?;
    info!(
        clean_rows = summary.cleaning.rows_after,
        cities = summary.top_cities.len(),
        "done"
    );

    Ok(())
}
