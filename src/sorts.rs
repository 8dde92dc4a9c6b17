use std::time::Instant;

use radsort::sort_by_key;
use rayon::prelude::*;

use crate::error::Result;
use crate::ruranges_structs::{GroupRun, Interval, RunPair, PARALLEL_THRESHOLD};
use crate::validate;

/// A throwaway, grouped and sorted view of one interval collection.
///
/// `intervals` is ordered by `(group, start, end)` with ties kept in input
/// order, `order[i]` is the input position of `intervals[i]`, and `runs`
/// partitions `intervals` into one contiguous slice per group.
#[derive(Debug, Clone)]
pub struct SortedBatch {
    pub intervals: Vec<Interval>,
    pub order: Vec<usize>,
    pub runs: Vec<GroupRun>,
}

impl SortedBatch {
    /// Builds the view without touching the caller's columns. Columns must
    /// already have been validated.
    pub fn new(groups: &[u32], starts: &[i64], ends: &[i64], idxs: &[u64]) -> Self {
        let order = build_sorted_order(groups, starts, ends);
        let intervals: Vec<Interval> = order
            .iter()
            .map(|&i| Interval {
                group: groups[i],
                start: starts[i],
                end: ends[i],
                idx: idxs[i],
            })
            .collect();
        let runs = group_runs(&intervals);

        SortedBatch {
            intervals,
            order,
            runs,
        }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn run(&self, range: &std::ops::Range<usize>) -> &[Interval] {
        &self.intervals[range.clone()]
    }
}

/// Permutation that sorts the columns by `(group, start, end)`.
///
/// radsort is stable, so sorting by the least significant key first gives the
/// lexicographic order with equal keys left in input order.
pub fn build_sorted_order(groups: &[u32], starts: &[i64], ends: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..groups.len()).collect();

    sort_by_key(&mut order, |&i| ends[i]);
    sort_by_key(&mut order, |&i| starts[i]);
    sort_by_key(&mut order, |&i| groups[i]);

    order
}

pub fn group_runs(intervals: &[Interval]) -> Vec<GroupRun> {
    let mut runs = Vec::new();
    let mut run_start = 0;

    for i in 1..=intervals.len() {
        if i == intervals.len() || intervals[i].group != intervals[run_start].group {
            runs.push(GroupRun {
                group: intervals[run_start].group,
                range: run_start..i,
            });
            run_start = i;
        }
    }

    runs
}

/// Pairs every run of the first batch with the run of the same group in the
/// second batch. Groups present only in the second batch are dropped.
pub fn pair_runs(runs: &[GroupRun], runs2: &[GroupRun]) -> Vec<RunPair> {
    let mut pairs = Vec::with_capacity(runs.len());
    let mut j = 0;

    for run in runs {
        while j < runs2.len() && runs2[j].group < run.group {
            j += 1;
        }
        let b = match runs2.get(j) {
            Some(run2) if run2.group == run.group => run2.range.clone(),
            _ => 0..0,
        };
        pairs.push(RunPair {
            group: run.group,
            a: run.range.clone(),
            b,
        });
    }

    pairs
}

/// Runs `f` on every run pair, in parallel once the inputs are large enough.
/// Results come back in run order either way.
pub fn map_run_pairs<T, F>(pairs: &[RunPair], total: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&RunPair) -> T + Sync + Send,
{
    if total >= PARALLEL_THRESHOLD {
        pairs.par_iter().map(&f).collect()
    } else {
        pairs.iter().map(&f).collect()
    }
}

/// The caller indices in `(group, start, end)` order.
pub fn sort_order_idx(groups: &[u32], starts: &[i64], ends: &[i64], idxs: &[u64]) -> Result<Vec<u64>> {
    validate::check_columns(groups, starts, ends, idxs)?;
    let start = Instant::now();

    let indexes: Vec<u64> = build_sorted_order(groups, starts, ends)
        .into_iter()
        .map(|i| idxs[i])
        .collect();

    log::debug!("sorted {} intervals in {:?}", indexes.len(), start.elapsed());
    Ok(indexes)
}
