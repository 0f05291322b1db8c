//! Correlation Module
//! Pairwise Pearson correlation over the numeric columns of a table.

use crate::data::DataLoader;
use polars::prelude::cov::pearson_corr;
use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

/// Square correlation matrix labelled by column name.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate every numeric column of `df` with every other.
    ///
    /// Nulls are skipped pairwise. The diagonal is always 1.0; an entry
    /// involving a column with zero variance (or fewer than two complete
    /// pairs) is NaN.
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let columns = DataLoader::numeric_columns(df);
        let mut series = Vec::with_capacity(columns.len());
        for name in &columns {
            let values = df.column(name)?.cast(&DataType::Float64)?;
            series.push(values.f64()?.clone());
        }

        let matrix = Self::from_columns(columns, &series);
        info!(columns = ?matrix.columns, "computed correlation matrix");
        Ok(matrix)
    }

    pub fn from_columns(columns: Vec<String>, series: &[Float64Chunked]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];

        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let corr = pairwise_pearson(&series[i], &series[j]).unwrap_or_else(|| {
                    warn!(
                        left = %columns[i],
                        right = %columns[j],
                        "correlation undefined (zero variance), reporting NaN"
                    );
                    f64::NAN
                });
                values[i][j] = corr;
                values[j][i] = corr;
            }
        }

        Self { columns, values }
    }

    #[cfg(test)]
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }
}

/// Pearson correlation over the rows where both sides are present.
///
/// `None` when fewer than two such rows exist or either side is constant.
fn pairwise_pearson(x: &Float64Chunked, y: &Float64Chunked) -> Option<f64> {
    pearson_corr(x, y)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Float64Chunked {
        Float64Chunked::from_slice("x".into(), values)
    }

    #[test]
    fn perfect_linear_relationships() {
        let x = column(&[1.0, 2.0, 3.0, 4.0]);
        let up = column(&[10.0, 20.0, 30.0, 40.0]);
        let down = column(&[8.0, 6.0, 4.0, 2.0]);

        assert!((pairwise_pearson(&x, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pairwise_pearson(&x, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_has_no_correlation() {
        let x = column(&[1.0, 2.0, 3.0]);
        let flat = column(&[5.0, 5.0, 5.0]);
        assert_eq!(pairwise_pearson(&x, &flat), None);
        assert_eq!(pairwise_pearson(&column(&[1.0]), &column(&[2.0])), None);
        assert_eq!(pairwise_pearson(&column(&[]), &column(&[])), None);
    }

    #[test]
    fn nulls_are_skipped_pairwise() {
        let x = Float64Chunked::from_slice_options(
            "x".into(),
            &[Some(1.0), None, Some(2.0), Some(3.0)],
        );
        let y = Float64Chunked::from_slice_options(
            "y".into(),
            &[Some(2.0), Some(100.0), Some(4.0), Some(6.0)],
        );
        assert!((pairwise_pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);

        let sparse =
            Float64Chunked::from_slice_options("s".into(), &[None, Some(7.0), None, Some(1.0)]);
        // Only one complete pair with `x`.
        assert_eq!(pairwise_pearson(&x, &sparse), None);
    }

    #[test]
    fn matches_textbook_value() {
        // Sxy = 6, Sxx = 10, Syy = 6.
        let x = column(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = column(&[2.0, 4.0, 5.0, 4.0, 5.0]);
        let r = pairwise_pearson(&x, &y).unwrap();
        assert!((r - 0.7745966692414834).abs() < 1e-12, "r = {r}");
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let df = df!(
            "City" => ["A", "B", "C", "D", "E"],
            "SizeRank" => [1i64, 2, 3, 4, 5],
            "HousePrice" => [500000.0f64, 350000.0, 410000.0, 200000.0, 180000.0],
            "Flat" => [1.0f64, 1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();

        let m = CorrelationMatrix::from_dataframe(&df).unwrap();
        assert_eq!(m.columns, vec!["SizeRank", "HousePrice", "Flat"]);

        let n = m.columns.len();
        for i in 0..n {
            assert_eq!(m.values[i][i], 1.0);
            for j in 0..n {
                let (a, b) = (m.values[i][j], m.values[j][i]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
                assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
            }
        }

        assert!(m.get("SizeRank", "HousePrice").unwrap() < 0.0);
        assert!(m.get("Flat", "HousePrice").unwrap().is_nan());
        assert_eq!(m.get("Missing", "HousePrice"), None);
    }
}
