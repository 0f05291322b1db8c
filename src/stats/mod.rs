//! Statistics module - correlation, city ranking and price distribution

mod correlation;
mod density;
mod ranking;

pub use correlation::CorrelationMatrix;
pub use density::{PriceHistogram, KDE_POINTS};
pub use ranking::{CityMean, CityRanking};
