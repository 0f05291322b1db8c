//! Report module - console tables and the JSON run summary

mod summary;
mod table;

pub use summary::RunSummary;
pub use table::TableFormatter;
