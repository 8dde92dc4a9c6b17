use std::time::Instant;

use crate::error::Result;
use crate::ruranges_structs::ClusterOptions;
use crate::sorts::SortedBatch;
use crate::validate;

/// Assigns a cluster id to every interval.
///
/// Returns `(cluster_ids, idxs)` in sorted-batch order; callers reindex their
/// table with `idxs`. Ids count up across groups in discovery order.
pub fn sweep_line_cluster(
    chrs: &[u32],
    starts: &[i64],
    ends: &[i64],
    idxs: &[u64],
    options: &ClusterOptions,
) -> Result<(Vec<u64>, Vec<u64>)> {
    validate::check_columns(chrs, starts, ends, idxs)?;
    validate::check_slack(options.slack)?;
    let start = Instant::now();

    let mut indices = Vec::with_capacity(chrs.len());
    let mut cluster_ids = Vec::with_capacity(chrs.len());

    let batch = SortedBatch::new(chrs, starts, ends, idxs);

    let mut current_cluster: u64 = 0;
    let mut first = true;

    for run in &batch.runs {
        let intervals = batch.run(&run.range);
        let mut max_end = i64::MIN;

        for (i, iv) in intervals.iter().enumerate() {
            if i == 0 || iv.start >= max_end + options.slack {
                if !first {
                    current_cluster += 1;
                }
                first = false;
                max_end = iv.end;
            } else {
                max_end = max_end.max(iv.end);
            }
            indices.push(iv.idx);
            cluster_ids.push(current_cluster);
        }
    }

    log::debug!(
        "found {} clusters among {} intervals in {:?}",
        if first { 0 } else { current_cluster + 1 },
        indices.len(),
        start.elapsed()
    );

    Ok((cluster_ids, indices))
}
