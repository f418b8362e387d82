use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One `[timestamp_ms, price]` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(u64, f64)", into = "(u64, f64)")]
pub struct PricePoint {
    pub timestamp_ms: u64,
    pub price: f64,
}

impl From<(u64, f64)> for PricePoint {
    fn from((timestamp_ms, price): (u64, f64)) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

impl From<PricePoint> for (u64, f64) {
    fn from(point: PricePoint) -> Self {
        (point.timestamp_ms, point.price)
    }
}

pub type PriceSeries = Vec<PricePoint>;

/// Series keyed by checksummed token address, in first-request order.
pub type TokenPrices = IndexMap<String, PriceSeries>;

#[derive(Debug, Deserialize)]
pub(crate) struct MarketChart {
    pub prices: Option<PriceSeries>,
}
