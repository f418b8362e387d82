mod client;
pub use client::*;

mod fetcher;
pub use fetcher::*;

mod types;
pub use types::*;

use crate::errors::FetchError;

/// Historical USD prices for a token contract.
#[async_trait::async_trait]
pub trait MarketData: Send + Sync {
    /// Observations for `token` between `from` and `to` (Unix seconds), in
    /// upstream order.
    async fn price_range(
        &self,
        token: &str,
        from: u64,
        to: u64,
    ) -> Result<PriceSeries, FetchError>;
}
