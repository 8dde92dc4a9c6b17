use std::time::Instant;

use crate::error::Result;
use crate::ruranges_structs::{Interval, MergeOptions, MergedSpan};
use crate::sorts::SortedBatch;
use crate::validate;

/// Merges one group's sorted run into maximal spans. Same joining rule as
/// clustering: an interval extends the open span when `start < end + slack`.
pub fn merge_run(intervals: &[Interval], slack: i64) -> Vec<MergedSpan> {
    let mut spans: Vec<MergedSpan> = Vec::new();

    for iv in intervals {
        match spans.last_mut() {
            Some(span) if iv.start < span.end + slack => {
                span.end = span.end.max(iv.end);
                span.idx = iv.idx;
                span.count += 1;
            }
            _ => spans.push(MergedSpan {
                start: iv.start,
                end: iv.end,
                idx: iv.idx,
                count: 1,
            }),
        }
    }

    spans
}

/// Returns `(idxs, starts, ends, counts)`, one row per merged span, grouped
/// and ordered like the sorted batch.
pub fn sweep_line_merge(
    chrs: &[u32],
    starts: &[i64],
    ends: &[i64],
    idxs: &[u64],
    options: &MergeOptions,
) -> Result<(Vec<u64>, Vec<i64>, Vec<i64>, Vec<u64>)> {
    validate::check_columns(chrs, starts, ends, idxs)?;
    validate::check_slack(options.slack)?;
    let start = Instant::now();

    let mut out_indices = Vec::new();
    let mut out_starts = Vec::new();
    let mut out_ends = Vec::new();
    let mut counts = Vec::new();

    let batch = SortedBatch::new(chrs, starts, ends, idxs);
    for run in &batch.runs {
        for span in merge_run(batch.run(&run.range), options.slack) {
            out_indices.push(span.idx);
            out_starts.push(span.start);
            out_ends.push(span.end);
            counts.push(span.count);
        }
    }

    log::debug!("merged {} intervals into {} in {:?}", chrs.len(), out_indices.len(), start.elapsed());

    Ok((out_indices, out_starts, out_ends, counts))
}
