use std::time::Instant;

use crate::error::Result;
use crate::ruranges_structs::{Interval, SplicedOptions};
use crate::sorts::{self, SortedBatch};
use crate::validate;

/// Resolves one bound of the window against the spliced length of a feature:
/// negative values count from the 3' end, and the result is clamped to the
/// feature.
fn resolve(bound: i64, total_length: i64) -> i64 {
    let bound = if bound < 0 { total_length + bound } else { bound };
    bound.clamp(0, total_length)
}

/// Trims the segments of one feature, given in genomic order, to the spliced
/// window `[start, end)`. Output stays in genomic order.
fn trim_feature(
    segments: &[Interval],
    forward: bool,
    start: i64,
    end: Option<i64>,
    out: &mut Vec<(u64, i64, i64)>,
) {
    let total_length: i64 = segments.iter().map(|iv| iv.end - iv.start).sum();
    let global_start = resolve(start, total_length);
    let global_end = resolve(end.unwrap_or(total_length), total_length);
    if global_start >= global_end {
        return;
    }

    let first_out = out.len();
    let mut cumsum = 0;

    let mut trim = |iv: &Interval| {
        let length = iv.end - iv.start;
        let cumsum_start = cumsum;
        cumsum += length;

        let lo = global_start.max(cumsum_start);
        let hi = global_end.min(cumsum);
        if lo >= hi {
            return;
        }

        // Walk the clipped spliced offsets back into genomic space.
        if forward {
            out.push((iv.idx, iv.start + (lo - cumsum_start), iv.start + (hi - cumsum_start)));
        } else {
            out.push((iv.idx, iv.end - (hi - cumsum_start), iv.end - (lo - cumsum_start)));
        }
    };

    if forward {
        segments.iter().for_each(&mut trim);
    } else {
        segments.iter().rev().for_each(&mut trim);
        out[first_out..].reverse();
    }
}

/// Cuts the spliced subsequence `[start, end)` out of every feature.
///
/// A feature is one group code (for example chromosome x strand x transcript);
/// its segments are concatenated in transcription order, 5' to 3', which is
/// reverse genomic order when `strand_flags` is false. Negative bounds count
/// from the 3' end and `end = None` runs to the end of the feature.
///
/// Returns `(idxs, starts, ends)` of the segments that keep at least one base,
/// with trimmed coordinates, grouped and ordered like the sorted batch.
pub fn spliced_subseq(
    chrs: &[u32],
    starts: &[i64],
    ends: &[i64],
    idxs: &[u64],
    strand_flags: &[bool],
    start: i64,
    end: Option<i64>,
    options: &SplicedOptions,
) -> Result<(Vec<u64>, Vec<i64>, Vec<i64>)> {
    validate::check_columns(chrs, starts, ends, idxs)?;
    validate::check_strands(chrs, strand_flags)?;
    validate::check_window(start, end)?;
    let timer = Instant::now();

    let batch = SortedBatch::new(chrs, starts, ends, idxs);
    // Spliced subsequence needs no second collection; pair every run with nothing.
    let pairs = sorts::pair_runs(&batch.runs, &[]);

    let per_group = sorts::map_run_pairs(&pairs, batch.len(), |pair| {
        let forward = options.force_plus_strand || strand_flags[batch.order[pair.a.start]];
        let mut trimmed = Vec::new();
        trim_feature(batch.run(&pair.a), forward, start, end, &mut trimmed);
        trimmed
    });

    let mut out_idxs = Vec::with_capacity(batch.len());
    let mut out_starts = Vec::with_capacity(batch.len());
    let mut out_ends = Vec::with_capacity(batch.len());
    for (idx, s, e) in per_group.into_iter().flatten() {
        out_idxs.push(idx);
        out_starts.push(s);
        out_ends.push(e);
    }

    log::debug!(
        "spliced subsequence kept {} of {} segments in {:?}",
        out_idxs.len(),
        chrs.len(),
        timer.elapsed()
    );
    Ok((out_idxs, out_starts, out_ends))
}
