use eyre::WrapErr;
use indexmap::IndexSet;
use indicatif::ProgressBar;
use itertools::Itertools;
use tracing::{info, warn};

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod node;
pub mod period;
pub mod pools;
pub mod prices;
pub mod progress;
pub mod rate_limit;
pub mod report;
pub mod utils;

use cli::CliCmd;
use config::RewardsConfig;
use errors::UsageError;
use node::{BlockSource, NodeClient};
use period::{resolve_period, snapshot_blocks, PeriodParams};
use pools::{PoolFetcher, SubgraphClient};
use prices::{CoinGeckoClient, PriceFetcher};
use report::{write_data, PeriodSummary};
use utils::lower_hex;

pub async fn run(cmd: CliCmd) -> eyre::Result<()> {
    logging::init(cmd.verbosity.directive()?);

    // usage problems win over a missing config file
    let period = cmd.period.ok_or(UsageError::MissingPeriod)?;

    let config = RewardsConfig::load(&cmd.config).wrap_err("failed to load configuration")?;
    let params = resolve_period(
        Some(period),
        &config.period_block_delimiters,
        cmd.skip_block,
        cmd.output,
    )?;

    let summary = run_period(&config, &params, !cmd.verbosity.is_quiet()).await?;
    info!(
        target: "lp_rewards",
        "period {} done: {} pools, {} holders, {} tokens in {}",
        summary.period,
        summary.pool_count,
        summary.holder_count,
        summary.tokens.len(),
        params.period_folder().display()
    );

    Ok(())
}

/// Fetches every snapshot and the token prices of one period and writes the
/// reports under the period folder.
pub async fn run_period(
    config: &RewardsConfig,
    params: &PeriodParams,
    show_progress: bool,
) -> eyre::Result<PeriodSummary> {
    let timeout = config.request_timeout();
    let node = NodeClient::new(config.node_url.clone(), timeout)?;
    let pool_fetcher = PoolFetcher::from_config(
        SubgraphClient::new(config.subgraph_url.clone(), timeout)?,
        config,
    );
    let price_fetcher = PriceFetcher::new(
        CoinGeckoClient::new(config.market_api_url.clone(), timeout)?,
        config.rate_limit.build(),
    );

    info!(
        target: "lp_rewards",
        "period {}: blocks {} to {}",
        params.period, params.start_block, params.end_block
    );

    let head = node.latest_block().await.wrap_err("failed to read chain head")?;
    if head < params.end_block {
        warn!(target: "lp_rewards", "period ends at {} but the chain head is {head}", params.end_block);
    }

    let start_timestamp = node
        .block_timestamp(params.start_block)
        .await
        .wrap_err_with(|| format!("failed to read timestamp of block {}", params.start_block))?;
    let end_timestamp = node
        .block_timestamp(params.end_block)
        .await
        .wrap_err_with(|| format!("failed to read timestamp of block {}", params.end_block))?;

    let folder = params.period_folder();
    let snapshots = snapshot_blocks(
        params.start_block,
        params.end_block,
        config.blocks_per_snapshot,
        params.skip_block,
    );

    let mut pool_ids = IndexSet::new();
    let mut holders = IndexSet::new();
    let mut tokens = Vec::new();
    for &block in &snapshots {
        let pools = pool_fetcher
            .fetch_all_pools(block)
            .await
            .wrap_err_with(|| format!("failed to fetch pools at block {block}"))?;

        write_data(&pools, &folder.join("pools").join(block.to_string()));

        for pool in &pools {
            pool_ids.insert(pool.id);
            holders.extend(pool.share_holders.iter().copied());
            tokens.extend(pool.tokens_list.iter().copied());
        }
    }

    let tokens = tokens
        .into_iter()
        .unique()
        .map(|token| Some(lower_hex(&token)))
        .collect::<Vec<_>>();

    let bar = if show_progress {
        progress::price_bar(tokens.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    let prices = price_fetcher
        .fetch_token_prices(&tokens, start_timestamp, end_timestamp, &bar)
        .await
        .wrap_err("failed to fetch token prices")?;
    write_data(&prices, &folder.join("prices"));

    let summary = PeriodSummary::new(
        params,
        config,
        (start_timestamp, end_timestamp),
        snapshots,
        pool_ids.len(),
        holders.len(),
        &prices,
    )?;
    write_data(&summary, &folder.join("summary"));

    Ok(summary)
}
