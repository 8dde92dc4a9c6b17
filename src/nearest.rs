use std::time::Instant;

use radsort::sort_by_key;

use crate::error::{Result, RurangesError};
use crate::overlaps::overlap_runs;
use crate::ruranges_structs::{
    Direction, DistanceConvention, Interval, NearestOptions, OverlapPolicy, TieBreak, NO_DISTANCE,
    NO_MATCH,
};
use crate::sorts::{self, SortedBatch};
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Overlap,
    Upstream,
    Downstream,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Position in the start-sorted run of the second collection.
    rank: usize,
    /// Unsigned distance as reported.
    distance: i64,
    side: Side,
}

impl Candidate {
    fn key(&self, tie_break: TieBreak) -> (i64, u8, usize) {
        let side = match (tie_break, self.side) {
            (_, Side::Overlap) => 0,
            (TieBreak::BatchOrder, _) => 1,
            (TieBreak::PreferUpstream, Side::Upstream) => 1,
            (TieBreak::PreferUpstream, Side::Downstream) => 2,
            (TieBreak::PreferDownstream, Side::Downstream) => 1,
            (TieBreak::PreferDownstream, Side::Upstream) => 2,
        };
        (self.distance, side, self.rank)
    }

    fn reported(&self, signed: bool) -> i64 {
        if signed && self.side == Side::Upstream {
            -self.distance
        } else {
            self.distance
        }
    }
}

fn gap_distance(gap: i64, convention: DistanceConvention) -> i64 {
    match convention {
        DistanceConvention::Bedtools => gap + 1,
        DistanceConvention::Gap => gap,
    }
}

/// Takes at least `k` candidates from a stream of non-decreasing distances,
/// plus every further candidate tied with the last one taken.
fn take_with_ties<I>(candidates: I, k: usize, out: &mut Vec<Candidate>)
where
    I: Iterator<Item = Candidate>,
{
    let mut taken = 0;
    let mut last = None;
    for c in candidates {
        if taken >= k && Some(c.distance) != last {
            break;
        }
        last = Some(c.distance);
        taken += 1;
        out.push(c);
    }
}

/// Nearest neighbors of every interval of `intervals` among `intervals2`,
/// both sorted runs of one group. Entry `i` holds up to `k` pairs of
/// `(idx2, distance)`, closest first.
fn nearest_run(intervals: &[Interval], intervals2: &[Interval], options: &NearestOptions) -> Vec<Vec<(u64, i64)>> {
    if intervals2.is_empty() {
        return vec![Vec::new(); intervals.len()];
    }

    // Upstream neighbors are found by end, downstream ones by start.
    let mut by_end: Vec<usize> = (0..intervals2.len()).collect();
    sort_by_key(&mut by_end, |&k| intervals2[k].end);

    let mut hits: Vec<(usize, usize)> = Vec::new();
    if options.overlaps != OverlapPolicy::Ignore {
        overlap_runs(intervals, intervals2, 0, |i, k| hits.push((i, k)));
    }

    let mut results = Vec::with_capacity(intervals.len());
    let mut h = 0;
    let mut candidates: Vec<Candidate> = Vec::new();

    for (i, iv) in intervals.iter().enumerate() {
        let first_hit = h;
        while h < hits.len() && hits[h].0 == i {
            h += 1;
        }
        let own_hits = &hits[first_hit..h];

        if options.overlaps == OverlapPolicy::Exclude && !own_hits.is_empty() {
            results.push(Vec::new());
            continue;
        }

        candidates.clear();
        candidates.extend(own_hits.iter().map(|&(_, rank)| Candidate {
            rank,
            distance: 0,
            side: Side::Overlap,
        }));

        if options.direction != Direction::Upstream {
            let down = intervals2.partition_point(|b| b.start < iv.end);
            let stream = (down..intervals2.len()).map(|rank| Candidate {
                rank,
                distance: gap_distance(intervals2[rank].start - iv.end, options.distance),
                side: Side::Downstream,
            });
            take_with_ties(stream, options.k, &mut candidates);
        }

        if options.direction != Direction::Downstream {
            let up = by_end.partition_point(|&k| intervals2[k].end <= iv.start);
            // Points sitting exactly on a zero-length query are already downstream.
            let stream = by_end[..up]
                .iter()
                .rev()
                .filter(|&&rank| intervals2[rank].start < iv.end)
                .map(|&rank| Candidate {
                    rank,
                    distance: gap_distance(iv.start - intervals2[rank].end, options.distance),
                    side: Side::Upstream,
                });
            take_with_ties(stream, options.k, &mut candidates);
        }

        candidates.sort_by_key(|c| c.key(options.tie_break));
        results.push(
            candidates
                .iter()
                .take(options.k)
                .map(|c| (intervals2[c.rank].idx, c.reported(options.signed)))
                .collect(),
        );
    }

    results
}

/// Finds the `k` nearest intervals of the second collection for every
/// interval of the first, within equal group codes.
///
/// Returns `(idxs, idxs2, distances)` of length `k * chrs.len()`; slots
/// `p * k .. (p + 1) * k` belong to the interval at input position `p`,
/// closest first. Slots without a neighbor hold [`NO_MATCH`] and
/// [`NO_DISTANCE`].
pub fn sweep_line_k_nearest(
    chrs: &[u32],
    starts: &[i64],
    ends: &[i64],
    idxs: &[u64],
    chrs2: &[u32],
    starts2: &[i64],
    ends2: &[i64],
    idxs2: &[u64],
    options: &NearestOptions,
) -> Result<(Vec<u64>, Vec<u64>, Vec<i64>)> {
    validate::check_columns(chrs, starts, ends, idxs)?;
    validate::check_columns(chrs2, starts2, ends2, idxs2)?;
    validate::check_k(options.k)?;
    validate::check_reportable_idxs(idxs2)?;
    let k = options.k;
    let outlen = chrs.len().checked_mul(k).ok_or(RurangesError::InvalidK)?;
    let start = Instant::now();

    let mut results_idx1 = Vec::with_capacity(outlen);
    for &idx in idxs {
        results_idx1.extend(std::iter::repeat(idx).take(k));
    }
    let mut results_idx2 = vec![NO_MATCH; outlen];
    let mut results_dist = vec![NO_DISTANCE; outlen];

    let batch = SortedBatch::new(chrs, starts, ends, idxs);
    let batch2 = SortedBatch::new(chrs2, starts2, ends2, idxs2);
    let pairs = sorts::pair_runs(&batch.runs, &batch2.runs);

    let per_group = sorts::map_run_pairs(&pairs, batch.len() + batch2.len(), |pair| {
        nearest_run(batch.run(&pair.a), batch2.run(&pair.b), options)
    });

    let mut found = 0;
    for (pair, neighbors) in pairs.iter().zip(per_group) {
        for (offset, row) in neighbors.into_iter().enumerate() {
            let original_i = batch.order[pair.a.start + offset];
            for (count, (idx2, dist)) in row.into_iter().enumerate() {
                let slot = original_i * k + count;
                results_idx2[slot] = idx2;
                results_dist[slot] = dist;
                found += 1;
            }
        }
    }

    log::debug!(
        "found {} neighbors for {} intervals (k = {}) in {:?}",
        found,
        chrs.len(),
        k,
        start.elapsed()
    );
    Ok((results_idx1, results_idx2, results_dist))
}
