use std::{fs, io, path::Path, str::FromStr};

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    config::RewardsConfig,
    errors::FetchError,
    period::PeriodParams,
    prices::TokenPrices,
    utils::{scale, serde_decimal_str, SHARE_DECIMALS},
};

#[derive(Debug, Error)]
enum ReportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Pretty-prints `data` to `path.json`, creating missing folders. Failures
/// are logged, never returned.
pub fn write_data<T: Serialize + ?Sized>(data: &T, path: &Path) {
    let path = path.with_extension("json");
    match try_write(data, &path) {
        Ok(()) => debug!(target: "lp_rewards::report", "wrote {}", path.display()),
        Err(err) => error!(target: "lp_rewards::report", "failed to write {}: {err}", path.display()),
    }
}

fn try_write<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)?;

    fs::write(path, buf)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub address: String,
    pub whitelisted: bool,
    pub uncapped: bool,
    pub price_points: usize,
}

/// Totals of one period run, written next to the snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub period: u64,
    pub start_block: u64,
    pub end_block: u64,
    pub start_timestamp: u64,
    pub end_timestamp: u64,
    pub snapshots: Vec<u64>,
    #[serde(with = "serde_decimal_str")]
    pub reward_per_period: Decimal,
    /// `reward_per_period` in 18-decimal base units.
    pub reward_base_units: String,
    pub pool_count: usize,
    pub holder_count: usize,
    pub tokens: Vec<TokenSummary>,
    pub generated_at: DateTime<Utc>,
}

impl PeriodSummary {
    pub fn new(
        params: &PeriodParams,
        config: &RewardsConfig,
        timestamps: (u64, u64),
        snapshots: Vec<u64>,
        pool_count: usize,
        holder_count: usize,
        prices: &TokenPrices,
    ) -> Result<Self, FetchError> {
        let tokens = prices
            .iter()
            .map(|(key, series)| {
                let address = Address::from_str(key).ok();
                TokenSummary {
                    address: key.clone(),
                    whitelisted: address.is_some_and(|a| config.is_whitelisted(&a)),
                    uncapped: address.is_some_and(|a| config.is_uncapped(&a)),
                    price_points: series.len(),
                }
            })
            .collect();

        Ok(Self {
            period: params.period,
            start_block: params.start_block,
            end_block: params.end_block,
            start_timestamp: timestamps.0,
            end_timestamp: timestamps.1,
            snapshots,
            reward_per_period: config.reward_per_period,
            reward_base_units: scale(config.reward_per_period, SHARE_DECIMALS)?.to_string(),
            pool_count,
            holder_count,
            tokens,
            generated_at: Utc::now(),
        })
    }
}
