use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to one of the upstream services. Every variant is fatal
/// to the fetch that produced it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("subgraph returned errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("{query} did not finish after {pages} pages")]
    PageLimit { query: String, pages: usize },

    #[error("node request failed: {0}")]
    Rpc(#[from] alloy_transport::TransportError),
}

/// Bad command line input for the period being computed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Usage: lp-rewards --period 1")]
    MissingPeriod,

    #[error(
        "Period {period} too big ({delimiters} block delimiters configured). Adjust config file to set block delimiters for the desired period"
    )]
    PeriodTooBig { period: u64, delimiters: usize },

    #[error("Period can't be zero")]
    ZeroPeriod,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid url in {var}: {source}")]
    Url {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}
