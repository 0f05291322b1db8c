//! Analysis Pipeline
//! Load → reshape → clean → correlate → rank, then chart and report.

use crate::charts::StaticChartRenderer;
use crate::config::AnalysisConfig;
use crate::data::{CleanReport, DataCleaner, DataLoader, DataReshaper, PRICE_COL};
use crate::report::{RunSummary, TableFormatter};
use crate::stats::{CityMean, CityRanking, CorrelationMatrix};
use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs;
use tracing::info;

/// Everything computed before anything is drawn.
pub struct Analysis {
    pub wide_rows: usize,
    pub value_columns: usize,
    pub long_rows: usize,
    pub cleaning: CleanReport,
    pub cleaned: DataFrame,
    pub correlation: CorrelationMatrix,
    pub top_cities: Vec<CityMean>,
}

impl Analysis {
    pub fn prices(&self) -> Result<Vec<f64>> {
        Ok(self
            .cleaned
            .column(PRICE_COL)?
            .f64()?
            .into_iter()
            .flatten()
            .collect())
    }
}

/// Run the data steps without touching the output directory.
pub fn analyze(config: &AnalysisConfig) -> Result<Analysis> {
    let wide = DataLoader::load_csv(&config.input)
        .with_context(|| format!("loading {}", config.input.display()))?;

    let long = DataReshaper::melt_to_long(&wide, &config.id_columns)
        .context("reshaping to long format")?;
    let value_columns = DataReshaper::value_columns(&wide, &config.id_columns).len();

    let (cleaned, cleaning) = DataCleaner::clean(&long).context("cleaning long table")?;

    let correlation =
        CorrelationMatrix::from_dataframe(&cleaned).context("computing correlation matrix")?;

    let top_cities = CityRanking::top_cities(&cleaned, config.top_cities)
        .context("ranking cities by mean price")?;

    Ok(Analysis {
        wide_rows: wide.height(),
        value_columns,
        long_rows: long.height(),
        cleaning,
        cleaned,
        correlation,
        top_cities,
    })
}

/// Full run: analysis, console tables, charts and the JSON summary.
pub fn run(config: &AnalysisConfig) -> Result<RunSummary> {
    let analysis = analyze(config)?;

    println!("{}", TableFormatter::correlation_table(&analysis.correlation));

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {}", config.out_dir.display()))?;

    let histogram_path = config.histogram_path();
    let histogram = StaticChartRenderer::render_price_distribution(
        &analysis.prices()?,
        config.histogram_bins,
        &histogram_path,
    )
    .context("rendering price distribution")?;

    let bar_chart_path = config.bar_chart_path();
    StaticChartRenderer::render_top_cities(
        &analysis.top_cities,
        &config.bar_chart_title(),
        &bar_chart_path,
    )
    .context("rendering top cities")?;

    println!("\nCleaned Data Sample:");
    println!(
        "{}",
        TableFormatter::preview_table(&analysis.cleaned, config.preview_rows)?
    );

    let summary = RunSummary {
        config: config.clone(),
        wide_rows: analysis.wide_rows,
        value_columns: analysis.value_columns,
        long_rows: analysis.long_rows,
        cleaning: analysis.cleaning,
        correlation: analysis.correlation,
        top_cities: analysis.top_cities,
        histogram_observations: histogram.total(),
        histogram_path,
        bar_chart_path,
    };
    let summary_path = config.summary_path();
    summary
        .write_json(&summary_path)
        .with_context(|| format!("writing {}", summary_path.display()))?;
    info!(path = %summary_path.display(), "wrote run summary");

    Ok(summary)
}
