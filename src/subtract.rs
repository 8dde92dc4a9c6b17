use std::time::Instant;

use crate::error::Result;
use crate::merge::merge_run;
use crate::ruranges_structs::{Interval, MergedSpan};
use crate::sorts::{self, SortedBatch};
use crate::validate;

/// Pushes the parts of `iv` not covered by `coverage` as `(idx, start, end)`,
/// left to right. `coverage` must be sorted, disjoint and free of empty spans.
fn subtract_interval(iv: &Interval, coverage: &[MergedSpan], out: &mut Vec<(u64, i64, i64)>) {
    let first = coverage.partition_point(|span| span.end <= iv.start);
    let overlapping = coverage[first..]
        .iter()
        .take_while(|span| span.start < iv.end);

    if iv.start == iv.end {
        // A point survives unless some span strictly contains it.
        if overlapping.take(1).count() == 0 {
            out.push((iv.idx, iv.start, iv.end));
        }
        return;
    }

    let mut cursor = iv.start;
    for span in overlapping {
        if span.start > cursor {
            out.push((iv.idx, cursor, span.start));
        }
        cursor = cursor.max(span.end);
    }
    if cursor < iv.end {
        out.push((iv.idx, cursor, iv.end));
    }
}

/// Subtracts the second collection from the first, group by group.
///
/// Returns `(idxs, starts, ends)` with one row per surviving fragment: fully
/// covered intervals disappear and partially covered ones may split into
/// several fragments. Rows follow the sorted-batch order of the first
/// collection. Only the union of the second collection matters, so its
/// order and any duplicates in it do not change the result.
pub fn sweep_line_subtract(
    chrs: &[u32],
    starts: &[i64],
    ends: &[i64],
    idxs: &[u64],
    chrs2: &[u32],
    starts2: &[i64],
    ends2: &[i64],
    idxs2: &[u64],
) -> Result<(Vec<u64>, Vec<i64>, Vec<i64>)> {
    validate::check_columns(chrs, starts, ends, idxs)?;
    validate::check_columns(chrs2, starts2, ends2, idxs2)?;
    let start = Instant::now();

    let batch = SortedBatch::new(chrs, starts, ends, idxs);
    let batch2 = SortedBatch::new(chrs2, starts2, ends2, idxs2);
    let pairs = sorts::pair_runs(&batch.runs, &batch2.runs);

    let per_group = sorts::map_run_pairs(&pairs, batch.len() + batch2.len(), |pair| {
        let mut coverage = merge_run(batch2.run(&pair.b), 0);
        coverage.retain(|span| span.start < span.end);

        let mut fragments = Vec::with_capacity(pair.a.len());
        for iv in batch.run(&pair.a) {
            subtract_interval(iv, &coverage, &mut fragments);
        }
        fragments
    });

    let total: usize = per_group.iter().map(Vec::len).sum();
    let mut out_idxs = Vec::with_capacity(total);
    let mut out_starts = Vec::with_capacity(total);
    let mut out_ends = Vec::with_capacity(total);
    for (idx, s, e) in per_group.into_iter().flatten() {
        out_idxs.push(idx);
        out_starts.push(s);
        out_ends.push(e);
    }

    log::debug!(
        "subtraction left {} fragments of {} intervals in {:?}",
        out_idxs.len(),
        chrs.len(),
        start.elapsed()
    );
    Ok((out_idxs, out_starts, out_ends))
}
