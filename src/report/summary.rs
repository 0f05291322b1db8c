//! Run Summary Module
//! Machine-readable record of one analysis run, written as JSON next to
//! the charts.

use crate::config::AnalysisConfig;
use crate::data::CleanReport;
use crate::stats::{CityMean, CorrelationMatrix};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Failed to write summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub config: AnalysisConfig,
    pub wide_rows: usize,
    pub value_columns: usize,
    pub long_rows: usize,
    pub cleaning: CleanReport,
    /// NaN entries serialize as `null`.
    pub correlation: CorrelationMatrix,
    pub top_cities: Vec<CityMean>,
    /// Prices drawn in the histogram.
    pub histogram_observations: usize,
    pub histogram_path: PathBuf,
    pub bar_chart_path: PathBuf,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> Result<(), SummaryError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
