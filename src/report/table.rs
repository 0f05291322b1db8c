//! Console Table Module
//! Box-drawn tables for the correlation matrix and the data preview.

use crate::data::date_from_epoch_days;
use crate::stats::CorrelationMatrix;
use polars::prelude::*;
use prettytable::format::{consts::FORMAT_BOX_CHARS, Alignment};
use prettytable::{Cell, Row, Table};

pub struct TableFormatter;

impl TableFormatter {
    /// Correlation matrix with column names on both axes.
    pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
        let mut table = Self::new_table();

        let mut titles = vec![Cell::new("")];
        titles.extend(matrix.columns.iter().map(|c| Cell::new(c)));
        table.set_titles(Row::new(titles));

        for (name, row) in matrix.columns.iter().zip(matrix.values.iter()) {
            let mut cells = vec![Cell::new(name)];
            cells.extend(
                row.iter()
                    .map(|v| Cell::new_align(&format_correlation(*v), Alignment::RIGHT)),
            );
            table.add_row(Row::new(cells));
        }

        table
    }

    /// The first `rows` rows of `df`, one table column per frame column.
    pub fn preview_table(df: &DataFrame, rows: usize) -> PolarsResult<Table> {
        let head = df.head(Some(rows));
        let mut table = Self::new_table();

        let mut titles = vec![Cell::new("")];
        titles.extend(head.get_column_names().iter().map(|n| Cell::new(n.as_str())));
        table.set_titles(Row::new(titles));

        for i in 0..head.height() {
            let mut cells = vec![Cell::new(&i.to_string())];
            for column in head.get_columns() {
                let value = column.get(i)?;
                let align = match value {
                    AnyValue::Float64(_) | AnyValue::Int64(_) | AnyValue::Int32(_) => {
                        Alignment::RIGHT
                    }
                    _ => Alignment::LEFT,
                };
                cells.push(Cell::new_align(&format_value(value), align));
            }
            table.add_row(Row::new(cells));
        }

        Ok(table)
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*FORMAT_BOX_CHARS);
        table
    }
}

fn format_correlation(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", v)
    }
}

fn format_value(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => date_from_epoch_days(days)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        AnyValue::Float64(v) => format!("{:.1}", v),
        other => other.to_string(),
    }
}
