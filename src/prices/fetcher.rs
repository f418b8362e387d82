use std::sync::Arc;

use tracing::{debug, info};

use super::{MarketData, TokenPrices};
use crate::{
    errors::FetchError, progress::ProgressReporter, rate_limit::RateLimiter, utils::checksum,
};

/// Key under which every absent token entry is stored.
pub const NULL_TOKEN_KEY: &str = "null";

/// Map key for a token entry: its checksummed address, or [`NULL_TOKEN_KEY`]
/// when the entry is missing or blank.
pub fn token_key(token: Option<&str>) -> Result<String, FetchError> {
    match token.map(str::trim) {
        None | Some("") => Ok(NULL_TOKEN_KEY.to_string()),
        Some(address) => checksum(address),
    }
}

/// Fetches price series one token at a time behind a rate limiter.
pub struct PriceFetcher<M> {
    market: M,
    limiter: Arc<dyn RateLimiter>,
}

impl<M: MarketData> PriceFetcher<M> {
    pub fn new(market: M, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { market, limiter }
    }

    pub fn market(&self) -> &M {
        &self.market
    }

    /// Requests every entry of `tokens` in order, never two at once. A
    /// repeated token is requested again and replaces the earlier series.
    /// The first failure aborts the batch.
    pub async fn fetch_token_prices(
        &self,
        tokens: &[Option<String>],
        start_time: u64,
        end_time: u64,
        progress: &dyn ProgressReporter,
    ) -> Result<TokenPrices, FetchError> {
        let mut prices = TokenPrices::with_capacity(tokens.len());

        for token in tokens {
            let key = token_key(token.as_deref())?;

            self.limiter.acquire().await;
            let series = self.market.price_range(&key, start_time, end_time).await?;

            debug!(target: "lp_rewards::prices", "{key}: {} prices between {start_time} and {end_time}", series.len());
            prices.insert(key, series);
            progress.increment();
        }
        progress.finish();

        info!(target: "lp_rewards::prices", "fetched prices for {} tokens", prices.len());
        Ok(prices)
    }
}
