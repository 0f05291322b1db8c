//! Analysis settings.

use crate::data::IdColumns;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "Metro_zhvi_uc_sfrcondo_tier_0.33_0.67_sm_sa_month.csv";
pub const DEFAULT_OUT_DIR: &str = "plots";

/// Everything one run needs. Only the paths come from the command line.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub histogram_bins: usize,
    pub top_cities: usize,
    pub preview_rows: usize,
    #[serde(skip)]
    pub id_columns: IdColumns,
}

impl AnalysisConfig {
    pub fn new(input: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            input,
            out_dir,
            histogram_bins: 50,
            top_cities: 30,
            preview_rows: 5,
            id_columns: IdColumns::default(),
        }
    }

    pub fn histogram_path(&self) -> PathBuf {
        self.out_dir.join("price_distribution.png")
    }

    pub fn bar_chart_path(&self) -> PathBuf {
        self.out_dir.join("top_cities.png")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.out_dir.join("summary.json")
    }

    pub fn bar_chart_title(&self) -> String {
        format!(
            "Top {} Cities with Highest Average House Prices",
            self.top_cities
        )
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new(
            Path::new(DEFAULT_INPUT).to_path_buf(),
            Path::new(DEFAULT_OUT_DIR).to_path_buf(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dataset_export() {
        let config = AnalysisConfig::default();
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.histogram_bins, 50);
        assert_eq!(config.top_cities, 30);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.id_columns.city, "RegionName");
        assert_eq!(
            config.bar_chart_title(),
            "Top 30 Cities with Highest Average House Prices"
        );
        assert_eq!(
            config.histogram_path(),
            PathBuf::from("plots/price_distribution.png")
        );
    }
}
