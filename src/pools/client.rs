use std::time::Duration;

use alloy_primitives::Address;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::{
    query::{pool_shares_query, pools_query},
    types::{GraphRequest, GraphResponse, PoolSharesData, PoolsData},
    PoolIndexer, RawPool, RawShare,
};
use crate::errors::FetchError;

/// GraphQL client for the pool subgraph.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    http: reqwest::Client,
    url: Url,
}

impl SubgraphClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        Ok(Self { http, url })
    }

    async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<T, FetchError> {
        trace!(target: "lp_rewards::subgraph", "{query}");

        let http_err = |source| FetchError::Http {
            url: self.url.to_string(),
            source,
        };

        let response = self
            .http
            .post(self.url.clone())
            .header(ACCEPT, "application/json")
            .json(&GraphRequest { query })
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(http_err)?;
        let envelope: GraphResponse<T> =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                url: self.url.to_string(),
                source,
            })?;

        envelope.into_data()
    }
}

#[async_trait::async_trait]
impl PoolIndexer for SubgraphClient {
    async fn pools_page(
        &self,
        block: u64,
        pool_ids: &[Address],
        first: usize,
        skip: usize,
    ) -> Result<Vec<RawPool>, FetchError> {
        let data: PoolsData = self
            .query(&pools_query(first, skip, block, pool_ids))
            .await?;

        debug!(target: "lp_rewards::subgraph", "block {block}: {} pools at skip {skip}", data.pools.len());
        Ok(data.pools)
    }

    async fn shares_page(
        &self,
        block: u64,
        pool: Address,
        first: usize,
        skip: usize,
    ) -> Result<Vec<RawShare>, FetchError> {
        let data: PoolSharesData = self
            .query(&pool_shares_query(&pool, first, skip, block))
            .await?;

        let shares = data
            .pools
            .into_iter()
            .next()
            .ok_or(FetchError::MissingField("pools[0]"))?
            .shares;

        debug!(target: "lp_rewards::subgraph", "block {block}: {} holders of {pool:?} at skip {skip}", shares.len());
        Ok(shares)
    }
}
