use std::{path::Path, time::Duration};

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{errors::ConfigError, rate_limit::RateLimitConfig};

pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer";
pub const DEFAULT_MARKET_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Settings for one reward run. Built once by the entry point and handed to
/// the fetchers by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewardsConfig {
    /// Ethereum JSON-RPC endpoint used to resolve block timestamps.
    pub node_url: Url,
    #[serde(default = "default_subgraph_url")]
    pub subgraph_url: Url,
    #[serde(default = "default_market_api_url")]
    pub market_api_url: Url,
    /// Pools eligible for rewards.
    pub pools: Vec<Address>,
    /// Block heights delimiting consecutive periods.
    pub period_block_delimiters: Vec<u64>,
    /// Distance between pool snapshots inside a period, 0 for start and end only.
    #[serde(default)]
    pub blocks_per_snapshot: u64,
    pub reward_per_period: Decimal,
    #[serde(default)]
    pub whitelist_tokens: Vec<Address>,
    #[serde(default)]
    pub uncapped_tokens: Vec<Address>,
    /// Upper bound on pages per paginated query.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_subgraph_url() -> Url {
    Url::parse(DEFAULT_SUBGRAPH_URL).expect("static url")
}

fn default_market_api_url() -> Url {
    Url::parse(DEFAULT_MARKET_API_URL).expect("static url")
}

const fn default_max_pages() -> usize {
    10_000
}

const fn default_request_timeout_secs() -> u64 {
    60
}

impl RewardsConfig {
    /// Reads the TOML file at `path` and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.apply_env()?;

        Ok(config)
    }

    /// `SUBGRAPH_URL` and `MARKET_API_URL` take precedence over the file.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(url) = env_url("SUBGRAPH_URL")? {
            self.subgraph_url = url;
        }
        if let Some(url) = env_url("MARKET_API_URL")? {
            self.market_api_url = url;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_whitelisted(&self, token: &Address) -> bool {
        self.whitelist_tokens.contains(token)
    }

    pub fn is_uncapped(&self, token: &Address) -> bool {
        self.uncapped_tokens.contains(token)
    }
}

fn env_url(var: &'static str) -> Result<Option<Url>, ConfigError> {
    match std::env::var(var) {
        Ok(val) if !val.trim().is_empty() => Url::parse(val.trim())
            .map(Some)
            .map_err(|source| ConfigError::Url { var, source }),
        _ => Ok(None),
    }
}
