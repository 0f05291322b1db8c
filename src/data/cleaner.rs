//! Data Cleaner Module
//! Types the long table's `Date` and `HousePrice` columns and drops
//! incomplete rows.

use super::reshaper::{CITY_COL, DATE_COL, PRICE_COL, SIZE_RANK_COL, STATE_COL};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// `NaiveDate::num_days_from_ce` of 1970-01-01, the Polars `Date` epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub unparsed_dates: usize,
    pub unparsed_prices: usize,
}

impl CleanReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Parse a date header. Returns `None` for anything that is not a date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a price cell. Non-numeric and non-finite values are `None`.
pub fn parse_price(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Handles type coercion and null removal on the long table.
pub struct DataCleaner;

impl DataCleaner {
    /// Coerce `Date` to a date and `HousePrice` to `f64`, then drop every
    /// row holding a null in any column.
    pub fn clean(long: &DataFrame) -> Result<(DataFrame, CleanReport), CleanError> {
        let date_text = long.column(DATE_COL)?.cast(&DataType::String)?;
        let price_text = long.column(PRICE_COL)?.cast(&DataType::String)?;

        let days: Vec<Option<i32>> = date_text
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_date).map(date_to_epoch_days))
            .collect();
        let prices: Vec<Option<f64>> = price_text
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_price))
            .collect();

        let unparsed_dates = days.iter().filter(|d| d.is_none()).count();
        let unparsed_prices = prices.iter().filter(|p| p.is_none()).count();

        let dates = Series::new(DATE_COL.into(), days).cast(&DataType::Date)?;

        let typed = DataFrame::new(vec![
            long.column(CITY_COL)?.clone(),
            long.column(STATE_COL)?.clone(),
            long.column(SIZE_RANK_COL)?.clone(),
            Column::from(dates),
            Column::new(PRICE_COL.into(), prices),
        ])?;

        let complete = typed
            .get_columns()
            .iter()
            .map(|c| c.is_not_null())
            .reduce(|acc, mask| &acc & &mask)
            .unwrap_or_else(|| BooleanChunked::full("complete".into(), true, typed.height()));
        let cleaned = typed.filter(&complete)?;

        let report = CleanReport {
            rows_before: long.height(),
            rows_after: cleaned.height(),
            unparsed_dates,
            unparsed_prices,
        };

        info!(
            rows_before = report.rows_before,
            rows_after = report.rows_after,
            rows_dropped = report.rows_dropped(),
            unparsed_dates,
            unparsed_prices,
            "cleaned long table"
        );
        if report.rows_after == 0 {
            warn!("no rows survived cleaning");
        }

        Ok((cleaned, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long() -> DataFrame {
        df!(
            CITY_COL => [Some("New York, NY"), Some("New York, NY"), Some("Boston, MA"), Some("United States"), Some("Boston, MA")],
            STATE_COL => [Some("NY"), Some("NY"), Some("MA"), None, Some("MA")],
            SIZE_RANK_COL => [1i64, 1, 10, 0, 10],
            DATE_COL => ["2015-01-31", "RegionType", "2015-01-31", "2015-01-31", "2015-02-28"],
            PRICE_COL => [Some("400000.0"), Some("msa"), None, Some("250000"), Some("NaN")],
        )
        .unwrap()
    }

    #[test]
    fn month_header_parses_to_date() {
        assert_eq!(
            parse_date("2015-01-31"),
            NaiveDate::from_ymd_opt(2015, 1, 31)
        );
        assert_eq!(parse_date("01/31/2015"), NaiveDate::from_ymd_opt(2015, 1, 31));
        assert_eq!(parse_date("RegionID"), None);
        assert_eq!(parse_date("2015-02-30"), None);
    }

    #[test]
    fn price_parsing_rejects_text_and_nan() {
        assert_eq!(parse_price(" 123456.5 "), Some(123456.5));
        assert_eq!(parse_price("msa"), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn epoch_days_match_polars_date_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(epoch), 0);
        let d = NaiveDate::from_ymd_opt(2015, 1, 31).unwrap();
        assert_eq!(date_from_epoch_days(date_to_epoch_days(d)), Some(d));
    }

    #[test]
    fn drops_rows_with_any_missing_value() {
        let (cleaned, report) = DataCleaner::clean(&long()).unwrap();

        assert_eq!(cleaned.height(), 1);
        assert_eq!(report.rows_before, 5);
        assert_eq!(report.rows_after, 1);
        assert_eq!(report.rows_dropped(), 4);
        assert_eq!(report.unparsed_dates, 1);
        assert_eq!(report.unparsed_prices, 3);

        for column in cleaned.get_columns() {
            assert_eq!(column.null_count(), 0, "{}", column.name());
        }
        assert_eq!(cleaned.column(DATE_COL).unwrap().dtype(), &DataType::Date);
        assert_eq!(cleaned.column(PRICE_COL).unwrap().dtype(), &DataType::Float64);

        let days = cleaned
            .column(DATE_COL)
            .unwrap()
            .cast(&DataType::Int32)
            .unwrap()
            .i32()
            .unwrap()
            .get(0)
            .unwrap();
        assert_eq!(
            date_from_epoch_days(days),
            NaiveDate::from_ymd_opt(2015, 1, 31)
        );
        assert_eq!(
            cleaned.column(PRICE_COL).unwrap().f64().unwrap().get(0),
            Some(400000.0)
        );
    }
}
