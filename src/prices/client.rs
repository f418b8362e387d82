use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::debug;
use url::Url;

use super::{types::MarketChart, MarketData, PriceSeries};
use crate::errors::FetchError;

/// Asset platform prices are looked up on.
pub const PLATFORM: &str = "ethereum";

pub const VS_CURRENCY: &str = "usd";

/// CoinGecko-style `market_chart/range` client.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base: Url,
}

impl CoinGeckoClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Http {
                url: base.to_string(),
                source,
            })?;

        Ok(Self { http, base })
    }

    fn range_url(&self, token: &str) -> String {
        format!(
            "{}/coins/{PLATFORM}/contract/{token}/market_chart/range",
            self.base.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl MarketData for CoinGeckoClient {
    async fn price_range(
        &self,
        token: &str,
        from: u64,
        to: u64,
    ) -> Result<PriceSeries, FetchError> {
        let url = self.range_url(token);
        let http_err = |source| FetchError::Http {
            url: url.clone(),
            source,
        };

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("vs_currency", VS_CURRENCY.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ])
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(http_err)?;
        let chart: MarketChart =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;

        let prices = chart.prices.ok_or(FetchError::MissingField("prices"))?;
        debug!(target: "lp_rewards::prices", "{token}: {} observations", prices.len());

        Ok(prices)
    }
}
