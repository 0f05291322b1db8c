//! Data Reshaper Module
//! Unpivots the wide table (one column per month) into long format.

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

pub const CITY_COL: &str = "City";
pub const STATE_COL: &str = "State";
pub const SIZE_RANK_COL: &str = "SizeRank";
pub const DATE_COL: &str = "Date";
pub const PRICE_COL: &str = "HousePrice";

#[derive(Error, Debug)]
pub enum ReshapeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Identifier column '{0}' not found in input")]
    MissingColumn(String),
}

/// Source columns kept on every long row, and the names they get there.
#[derive(Debug, Clone)]
pub struct IdColumns {
    pub city: String,
    pub state: String,
    pub size_rank: String,
}

impl Default for IdColumns {
    fn default() -> Self {
        Self {
            city: "RegionName".to_string(),
            state: "StateName".to_string(),
            size_rank: "SizeRank".to_string(),
        }
    }
}

impl IdColumns {
    fn contains(&self, name: &str) -> bool {
        name == self.city || name == self.state || name == self.size_rank
    }
}

/// Handles the wide-to-long transformation (melt).
pub struct DataReshaper;

impl DataReshaper {
    /// Every column that is not an identifier, in table order.
    pub fn value_columns(df: &DataFrame, ids: &IdColumns) -> Vec<String> {
        df.get_column_names()
            .iter()
            .filter(|name| !ids.contains(name.as_str()))
            .map(|name| name.to_string())
            .collect()
    }

    /// Transform the wide table into long format.
    ///
    /// Output columns: ["City", "State", "SizeRank", "Date", "HousePrice"].
    /// `Date` holds the source column header and `HousePrice` the raw cell
    /// text; both are typed later by the cleaner. Rows are emitted column by
    /// column, so the output has `height * value_columns` rows.
    pub fn melt_to_long(df: &DataFrame, ids: &IdColumns) -> Result<DataFrame, ReshapeError> {
        for name in [&ids.city, &ids.state, &ids.size_rank] {
            if df.column(name).is_err() {
                return Err(ReshapeError::MissingColumn(name.clone()));
            }
        }

        let city_col = df.column(&ids.city)?.cast(&DataType::String)?;
        let state_col = df.column(&ids.state)?.cast(&DataType::String)?;
        let rank_col = df.column(&ids.size_rank)?.cast(&DataType::Int64)?;
        let city_ca = city_col.str()?;
        let state_ca = state_col.str()?;
        let rank_ca = rank_col.i64()?;

        let value_cols = Self::value_columns(df, ids);
        let capacity = df.height() * value_cols.len();

        let mut cities: Vec<Option<&str>> = Vec::with_capacity(capacity);
        let mut states: Vec<Option<&str>> = Vec::with_capacity(capacity);
        let mut ranks: Vec<Option<i64>> = Vec::with_capacity(capacity);
        let mut dates: Vec<&str> = Vec::with_capacity(capacity);
        let mut prices: Vec<Option<String>> = Vec::with_capacity(capacity);

        for value_col in &value_cols {
            let text = df.column(value_col)?.cast(&DataType::String)?;
            let text_ca = text.str()?;

            for i in 0..df.height() {
                cities.push(city_ca.get(i));
                states.push(state_ca.get(i));
                ranks.push(rank_ca.get(i));
                dates.push(value_col.as_str());
                prices.push(text_ca.get(i).map(str::to_string));
            }
        }

        let long = DataFrame::new(vec![
            Column::new(CITY_COL.into(), cities),
            Column::new(STATE_COL.into(), states),
            Column::new(SIZE_RANK_COL.into(), ranks),
            Column::new(DATE_COL.into(), dates),
            Column::new(PRICE_COL.into(), prices),
        ])?;

        info!(
            wide_rows = df.height(),
            value_columns = value_cols.len(),
            long_rows = long.height(),
            "reshaped to long format"
        );

        Ok(long)
    }
}
