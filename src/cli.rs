use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};

use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::filter::{Directive, ParseError};

#[derive(Debug, Parser)]
#[command(
    name = "lp-rewards",
    about = "Pool share holders and token prices for a liquidity mining period",
    long_about = None
)]
pub struct CliCmd {
    /// reward period, an index into `period_block_delimiters` starting at 1
    #[arg(short, long)]
    pub period: Option<u64>,

    /// skip snapshots below this block when resuming a run
    #[arg(long)]
    pub skip_block: Option<u64>,

    /// folder reports are written to, defaults to `reports`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file holding pools, period delimiters and the reward budget
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[clap(flatten)]
    pub verbosity: Verbosity,
}

/// The verbosity settings for the cli.
#[derive(Debug, Copy, Clone, Args)]
#[command(next_help_heading = "Display")]
pub struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v      Errors
    /// -vv     Warnings
    /// -vvv    Info
    /// -vvvv   Debug
    /// -vvvvv  Traces (warning: very verbose!)
    #[clap(short, long, action = ArgAction::Count, global = true, default_value_t = 3, verbatim_doc_comment, help_heading = "Display")]
    verbosity: u8,

    /// Silence all log output.
    #[clap(
        long,
        alias = "silent",
        short = 'q',
        global = true,
        help_heading = "Display"
    )]
    quiet: bool,
}

impl Verbosity {
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The [Directive] for this crate's targets, `off` when quiet.
    pub fn directive(&self) -> Result<Directive, ParseError> {
        if self.quiet {
            return Ok(LevelFilter::OFF.into());
        }

        let level = match self.verbosity.saturating_sub(1) {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        };

        format!("lp_rewards={level}").parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_period_arguments() {
        let cmd = CliCmd::parse_from([
            "lp-rewards",
            "--period",
            "2",
            "--skip-block",
            "150",
            "-o",
            "out",
        ]);

        assert_eq!(cmd.period, Some(2));
        assert_eq!(cmd.skip_block, Some(150));
        assert_eq!(cmd.output, Some(PathBuf::from("out")));
        assert_eq!(cmd.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn period_is_optional_at_parse_time() {
        let cmd = CliCmd::parse_from(["lp-rewards"]);
        assert_eq!(cmd.period, None);
    }

    #[test]
    fn verbosity_maps_to_directive() {
        let cmd = CliCmd::parse_from(["lp-rewards", "-vvvv"]);
        assert_eq!(cmd.verbosity.directive().unwrap().to_string(), "lp_rewards=debug");

        let quiet = CliCmd::parse_from(["lp-rewards", "-q"]);
        assert_eq!(quiet.verbosity.directive().unwrap().to_string(), "off");
    }
}
