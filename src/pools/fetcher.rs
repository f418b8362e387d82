use std::future::Future;

use alloy_primitives::Address;
use tracing::{debug, info};

use super::{Pool, PoolIndexer, RawPool};
use crate::{config::RewardsConfig, errors::FetchError, utils::lower_hex};

/// Page size of every subgraph query, also the inline holder page size.
pub const PAGE_SIZE: usize = 1000;

/// Assembles complete pool records for the allowlisted pools.
pub struct PoolFetcher<I> {
    indexer: I,
    pool_ids: Vec<Address>,
    max_pages: usize,
}

impl<I: PoolIndexer> PoolFetcher<I> {
    pub fn new(indexer: I, pool_ids: Vec<Address>, max_pages: usize) -> Self {
        Self {
            indexer,
            pool_ids,
            max_pages: max_pages.max(1),
        }
    }

    pub fn from_config(indexer: I, config: &RewardsConfig) -> Self {
        Self::new(indexer, config.pools.clone(), config.max_pages)
    }

    pub fn indexer(&self) -> &I {
        &self.indexer
    }

    /// Every allowlisted pool at `block` in upstream order. Pools whose inline
    /// holder page is full get their holders re-paginated individually.
    pub async fn fetch_all_pools(&self, block: u64) -> Result<Vec<Pool>, FetchError> {
        let raw_pools = paginate("pools", PAGE_SIZE, self.max_pages, |skip| {
            self.indexer
                .pools_page(block, &self.pool_ids, PAGE_SIZE, skip)
        })
        .await?;

        let mut pools = Vec::with_capacity(raw_pools.len());
        for raw in raw_pools {
            let holders = self.share_holders(block, &raw).await?;
            pools.push(Pool::from_raw(raw, holders));
        }

        info!(
            target: "lp_rewards::pools",
            "block {block}: fetched {} pools with {} holder entries",
            pools.len(),
            pools.iter().map(|p| p.share_holders.len()).sum::<usize>()
        );

        Ok(pools)
    }

    async fn share_holders(&self, block: u64, raw: &RawPool) -> Result<Vec<Address>, FetchError> {
        if raw.shares.len() != PAGE_SIZE {
            return Ok(raw.inline_holders());
        }

        debug!(target: "lp_rewards::pools", "pool {} has a full inline holder page, paginating", lower_hex(&raw.id));

        let label = format!("shares of {}", lower_hex(&raw.id));
        let shares = paginate(&label, PAGE_SIZE, self.max_pages, |skip| {
            self.indexer.shares_page(block, raw.id, PAGE_SIZE, skip)
        })
        .await?;

        Ok(shares.iter().map(|share| share.holder()).collect())
    }
}

/// Requests pages at offsets `0, page_size, 2 * page_size, ...` until one
/// comes back short, giving up after `max_pages` full pages.
async fn paginate<T, F, Fut>(
    label: &str,
    page_size: usize,
    max_pages: usize,
    mut fetch: F,
) -> Result<Vec<T>, FetchError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let mut results = Vec::new();

    for page in 0..max_pages {
        let batch = fetch(page * page_size).await?;
        let len = batch.len();
        results.extend(batch);

        if len < page_size {
            return Ok(results);
        }
    }

    Err(FetchError::PageLimit {
        query: label.to_string(),
        pages: max_pages,
    })
}
