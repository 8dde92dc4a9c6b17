use std::time::Instant;

use crate::error::Result;
use crate::ruranges_structs::{Interval, OverlapOptions};
use crate::sorts::{self, SortedBatch};
use crate::validate;

/// Positions of the second run that have started before the current query
/// end and were not yet seen to end at or before a query start.
///
/// Live entries sit in `slots[head..]` in start order. Dead entries are
/// dropped while walking, and survivors are packed against the unvisited
/// tail, so every visited entry is either reported or discarded.
#[derive(Debug, Default)]
struct ActiveList {
    slots: Vec<usize>,
    head: usize,
}

impl ActiveList {
    fn push(&mut self, k: usize) {
        self.slots.push(k);
    }

    /// Reports every live entry overlapping `[start, end)` and returns the
    /// number of entries looked at.
    fn visit<F>(&mut self, intervals2: &[Interval], start: i64, end: i64, mut emit: F) -> usize
    where
        F: FnMut(usize),
    {
        let mut write = self.head;
        let mut p = self.head;
        let mut visited = 0;

        while p < self.slots.len() {
            let k = self.slots[p];
            visited += 1;
            if intervals2[k].start >= end {
                break;
            }
            // Query starts never decrease, so a dead entry stays dead.
            if intervals2[k].end > start {
                emit(k);
                self.slots[write] = k;
                write += 1;
            }
            p += 1;
        }

        let kept = write - self.head;
        self.slots.copy_within(self.head..write, p - kept);
        self.head = p - kept;
        visited
    }
}

/// Sweeps two sorted runs and returns how many active entries were looked at.
fn sweep_runs<F>(intervals: &[Interval], intervals2: &[Interval], slack: i64, mut emit: F) -> usize
where
    F: FnMut(usize, usize),
{
    let mut active = ActiveList::default();
    let mut j = 0;
    let mut work = 0;

    for (i, iv) in intervals.iter().enumerate() {
        let start = iv.start - slack;
        let end = iv.end + slack;

        while j < intervals2.len() && intervals2[j].start < end {
            active.push(j);
            j += 1;
        }
        work += active.visit(intervals2, start, end, |k| emit(i, k));
    }
    work
}

/// Finds every overlapping pair between two sorted runs of the same group.
///
/// `emit(i, j)` is called with run-local positions, grouped by `i` ascending
/// and, within one `i`, with `j` ascending. Intervals of the first run are
/// widened by `slack` on both sides. Runs in time linear in the run lengths
/// plus the number of pairs.
pub fn overlap_runs<F>(intervals: &[Interval], intervals2: &[Interval], slack: i64, emit: F)
where
    F: FnMut(usize, usize),
{
    sweep_runs(intervals, intervals2, slack, emit);
}

/// Returns all overlapping pairs `(idx, idx2)` between two collections,
/// restricted to equal group codes. Pairs come in sorted-batch order of the
/// first collection, then of the second.
pub fn sweep_line_overlaps(
    chrs: &[u32],
    starts: &[i64],
    ends: &[i64],
    idxs: &[u64],
    chrs2: &[u32],
    starts2: &[i64],
    ends2: &[i64],
    idxs2: &[u64],
    options: &OverlapOptions,
) -> Result<(Vec<u64>, Vec<u64>)> {
    validate::check_columns(chrs, starts, ends, idxs)?;
    validate::check_columns(chrs2, starts2, ends2, idxs2)?;
    validate::check_slack(options.slack)?;
    let start = Instant::now();

    let mut overlaps = Vec::new();
    let mut overlaps2 = Vec::new();

    if chrs.is_empty() || chrs2.is_empty() {
        return Ok((overlaps, overlaps2));
    }

    let batch = SortedBatch::new(chrs, starts, ends, idxs);
    let batch2 = SortedBatch::new(chrs2, starts2, ends2, idxs2);
    let pairs = sorts::pair_runs(&batch.runs, &batch2.runs);

    let per_group = sorts::map_run_pairs(&pairs, batch.len() + batch2.len(), |pair| {
        let a = batch.run(&pair.a);
        let b = batch2.run(&pair.b);
        let mut found = Vec::new();
        overlap_runs(a, b, options.slack, |i, k| found.push((a[i].idx, b[k].idx)));
        found
    });

    for (idx, idx2) in per_group.into_iter().flatten() {
        overlaps.push(idx);
        overlaps2.push(idx2);
    }

    log::debug!("found {} overlapping pairs in {:?}", overlaps.len(), start.elapsed());
    Ok((overlaps, overlaps2))
}

/// The indices of the first collection, in sorted-batch order, that overlap
/// nothing in the second.
pub fn sweep_line_non_overlaps(
    chrs: &[u32],
    starts: &[i64],
    ends: &[i64],
    idxs: &[u64],
    chrs2: &[u32],
    starts2: &[i64],
    ends2: &[i64],
    idxs2: &[u64],
    options: &OverlapOptions,
) -> Result<Vec<u64>> {
    validate::check_columns(chrs, starts, ends, idxs)?;
    validate::check_columns(chrs2, starts2, ends2, idxs2)?;
    validate::check_slack(options.slack)?;
    let start = Instant::now();

    let batch = SortedBatch::new(chrs, starts, ends, idxs);
    let batch2 = SortedBatch::new(chrs2, starts2, ends2, idxs2);
    let pairs = sorts::pair_runs(&batch.runs, &batch2.runs);

    let per_group = sorts::map_run_pairs(&pairs, batch.len() + batch2.len(), |pair| {
        let a = batch.run(&pair.a);
        let mut hit = vec![false; a.len()];
        overlap_runs(a, batch2.run(&pair.b), options.slack, |i, _| hit[i] = true);
        a.iter()
            .zip(hit)
            .filter(|(_, hit)| !hit)
            .map(|(iv, _)| iv.idx)
            .collect::<Vec<u64>>()
    });

    let result: Vec<u64> = per_group.into_iter().flatten().collect();
    log::debug!("found {} non-overlapping intervals in {:?}", result.len(), start.elapsed());
    Ok(result)
}
