//! City Ranking Module
//! Mean house price per city, ordered from most to least expensive.

use crate::data::{CITY_COL, PRICE_COL};
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

/// Average price of one city across all dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMean {
    pub city: String,
    pub mean_price: f64,
    pub observations: u64,
}

pub struct CityRanking;

impl CityRanking {
    /// Mean `HousePrice` per `City`, sorted descending by mean. Ties are
    /// ordered by city name.
    pub fn city_means(df: &DataFrame) -> PolarsResult<Vec<CityMean>> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col(CITY_COL)])
            .agg([
                col(PRICE_COL).mean().alias("mean_price"),
                col(PRICE_COL).count().alias("observations"),
            ])
            .collect()?;

        let cities = grouped.column(CITY_COL)?.cast(&DataType::String)?;
        let means = grouped.column("mean_price")?.cast(&DataType::Float64)?;
        let counts = grouped.column("observations")?.cast(&DataType::UInt64)?;

        let mut ranked: Vec<CityMean> = cities
            .str()?
            .into_iter()
            .zip(means.f64()?.into_iter())
            .zip(counts.u64()?.into_iter())
            .filter_map(|((city, mean), count)| {
                Some(CityMean {
                    city: city?.to_string(),
                    mean_price: mean.filter(|m| m.is_finite())?,
                    observations: count.unwrap_or(0),
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.mean_price
                .partial_cmp(&a.mean_price)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.city.cmp(&b.city))
        });

        Ok(ranked)
    }

    /// The `n` cities with the highest mean price.
    pub fn top_cities(df: &DataFrame, n: usize) -> PolarsResult<Vec<CityMean>> {
        let mut ranked = Self::city_means(df)?;
        ranked.truncate(n);
        Ok(ranked)
    }
}
