use std::path::PathBuf;

use serde::Serialize;

use crate::errors::UsageError;

pub const DEFAULT_OUTPUT_FOLDER: &str = "reports";

/// Block range and output location of the period being computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodParams {
    pub period: u64,
    pub start_block: u64,
    pub end_block: u64,
    pub skip_block: Option<u64>,
    pub output_folder: PathBuf,
}

impl PeriodParams {
    /// Folder holding every report of this period.
    pub fn period_folder(&self) -> PathBuf {
        self.output_folder.join(self.period.to_string())
    }
}

/// Maps a 1-based period index onto `delimiters[period - 1]..delimiters[period]`.
pub fn resolve_period(
    period: Option<u64>,
    delimiters: &[u64],
    skip_block: Option<u64>,
    output: Option<PathBuf>,
) -> Result<PeriodParams, UsageError> {
    let period = period.ok_or(UsageError::MissingPeriod)?;

    let end_idx = usize::try_from(period)
        .ok()
        .filter(|idx| *idx < delimiters.len())
        .ok_or(UsageError::PeriodTooBig {
            period,
            delimiters: delimiters.len(),
        })?;

    if end_idx == 0 {
        return Err(UsageError::ZeroPeriod);
    }

    Ok(PeriodParams {
        period,
        start_block: delimiters[end_idx - 1],
        end_block: delimiters[end_idx],
        skip_block,
        output_folder: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FOLDER)),
    })
}

/// Blocks at which pool state is captured: every `step` blocks from `start`,
/// then `end`. Blocks below `skip_block` are left out.
pub fn snapshot_blocks(start: u64, end: u64, step: u64, skip_block: Option<u64>) -> Vec<u64> {
    let mut blocks = if step == 0 || end <= start {
        vec![start]
    } else {
        (start..end).step_by(step as usize).collect()
    };
    if end > start {
        blocks.push(end);
    }

    if let Some(skip) = skip_block {
        blocks.retain(|block| *block >= skip);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_period_uses_first_two_delimiters() {
        let params = resolve_period(Some(1), &[100, 200], None, None).unwrap();

        assert_eq!(params.start_block, 100);
        assert_eq!(params.end_block, 200);
        assert_eq!(params.output_folder, PathBuf::from("reports"));
        assert_eq!(params.period_folder(), PathBuf::from("reports/1"));
    }

    #[test]
    fn out_of_bounds_periods_are_usage_errors() {
        assert_eq!(
            resolve_period(Some(0), &[100, 200], None, None),
            Err(UsageError::ZeroPeriod)
        );
        assert_eq!(
            resolve_period(Some(2), &[100, 200], None, None),
            Err(UsageError::PeriodTooBig {
                period: 2,
                delimiters: 2
            })
        );
        assert_eq!(
            resolve_period(None, &[100, 200], None, None),
            Err(UsageError::MissingPeriod)
        );
        assert_eq!(
            resolve_period(Some(u64::MAX), &[100, 200], None, None),
            Err(UsageError::PeriodTooBig {
                period: u64::MAX,
                delimiters: 2
            })
        );
    }

    #[test]
    fn zero_with_no_delimiters_reports_size_first() {
        assert!(matches!(
            resolve_period(Some(0), &[], None, None),
            Err(UsageError::PeriodTooBig { .. })
        ));
    }

    #[test]
    fn keeps_skip_block_and_output() {
        let params =
            resolve_period(Some(2), &[10, 20, 30], Some(25), Some("out".into())).unwrap();

        assert_eq!((params.start_block, params.end_block), (20, 30));
        assert_eq!(params.skip_block, Some(25));
        assert_eq!(params.output_folder, PathBuf::from("out"));
    }

    #[test]
    fn snapshots_cover_the_period() {
        assert_eq!(
            snapshot_blocks(10606940, 10606980, 10, None),
            vec![10606940, 10606950, 10606960, 10606970, 10606980]
        );
        assert_eq!(snapshot_blocks(100, 125, 10, None), vec![100, 110, 120, 125]);
        assert_eq!(snapshot_blocks(100, 200, 0, None), vec![100, 200]);
        assert_eq!(snapshot_blocks(100, 100, 10, None), vec![100]);
    }

    #[test]
    fn skip_block_drops_earlier_snapshots() {
        assert_eq!(snapshot_blocks(100, 140, 10, Some(115)), vec![120, 130, 140]);
        assert!(snapshot_blocks(100, 140, 10, Some(141)).is_empty());
    }
}
