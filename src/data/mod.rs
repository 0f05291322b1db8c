//! Data module - CSV loading, reshaping and cleaning

mod cleaner;
mod loader;
mod reshaper;

pub use cleaner::{date_from_epoch_days, CleanReport, DataCleaner};
pub use loader::DataLoader;
pub use reshaper::{DataReshaper, IdColumns, CITY_COL, PRICE_COL};
