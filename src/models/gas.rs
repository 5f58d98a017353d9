//! Gas-market data returned by the gas data provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One sample of a gas price history line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GasHistoryPoint {
    /// Gas price in gwei
    pub gas_price: f64,

    /// When the sample was taken
    pub created_on: DateTime<Utc>,
}

/// Shared, immutable history series.
///
/// Cached series are handed out by reference count so repeated cache hits
/// return the very same allocation.
pub type HistorySeries = Arc<Vec<GasHistoryPoint>>;

/// Expected confirmation time at a given gas price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfTimePoint {
    /// Gas price in gwei
    pub gas_price: f64,

    /// Predicted minutes until confirmation
    pub mins: f64,
}

/// A network-condition notice shown above the gas tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct GasAdvisory {
    pub title: String,
    pub body: String,
    pub active: bool,
}

/// Highest gas price across any number of series, or 0 when all are empty.
pub fn max_gas_price<'a, I>(series: I) -> f64
where
    I: IntoIterator<Item = &'a [GasHistoryPoint]>,
{
    series
        .into_iter()
        .flat_map(|points| points.iter())
        .fold(0.0_f64, |max, point| max.max(point.gas_price))
}
