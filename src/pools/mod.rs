mod client;
pub use client::*;

mod fetcher;
pub use fetcher::*;

pub mod query;

mod types;
pub use types::*;

use alloy_primitives::Address;

use crate::errors::FetchError;

/// Paged access to historical pool state.
#[async_trait::async_trait]
pub trait PoolIndexer: Send + Sync {
    /// `first` pools among `pool_ids` at `block`, starting at offset `skip`.
    async fn pools_page(
        &self,
        block: u64,
        pool_ids: &[Address],
        first: usize,
        skip: usize,
    ) -> Result<Vec<RawPool>, FetchError>;

    /// `first` holders of `pool` at `block`, starting at offset `skip`.
    async fn shares_page(
        &self,
        block: u64,
        pool: Address,
        first: usize,
        skip: usize,
    ) -> Result<Vec<RawShare>, FetchError>;
}
