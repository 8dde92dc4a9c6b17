//! Set-theoretic properties every engine must keep on random input.

mod common;

use std::collections::BTreeSet;

use common::{covered, overlaps, random_columns, random_columns_of_len, rng, Columns};
use pretty_assertions::assert_eq;
use ruranges::ruranges_structs::PARALLEL_THRESHOLD;
use ruranges::{
    sort_order_idx, spliced_subseq, sweep_line_cluster, sweep_line_k_nearest, sweep_line_merge,
    sweep_line_non_overlaps, sweep_line_overlaps, sweep_line_subtract, ClusterOptions,
    MergeOptions, NearestOptions, OverlapOptions, SplicedOptions,
};

fn join(a: &Columns, b: &Columns) -> Vec<(u64, u64)> {
    let (i, j) = sweep_line_overlaps(
        &a.chrs, &a.starts, &a.ends, &a.idxs,
        &b.chrs, &b.starts, &b.ends, &b.idxs,
        &OverlapOptions::default(),
    )
    .unwrap();
    i.into_iter().zip(j).collect()
}

fn subtract(a: &Columns, b: &Columns) -> Vec<(u64, i64, i64)> {
    let (i, s, e) = sweep_line_subtract(
        &a.chrs, &a.starts, &a.ends, &a.idxs,
        &b.chrs, &b.starts, &b.ends, &b.idxs,
    )
    .unwrap();
    i.into_iter().zip(s).zip(e).map(|((i, s), e)| (i, s, e)).collect()
}

#[test]
fn sweep_join_is_symmetric() {
    let mut rng = rng(1);
    for _ in 0..200 {
        let a = random_columns(&mut rng, 40, 3, 500);
        let b = random_columns(&mut rng, 40, 3, 500);

        let forward: BTreeSet<(u64, u64)> = join(&a, &b).into_iter().collect();
        let backward: BTreeSet<(u64, u64)> = join(&b, &a).into_iter().map(|(j, i)| (i, j)).collect();
        assert_eq!(forward, backward);
    }
}

#[test]
fn clusters_are_overlap_components() {
    let mut rng = rng(2);
    for _ in 0..200 {
        let a = random_columns(&mut rng, 40, 3, 500);
        let (ids, idxs) =
            sweep_line_cluster(&a.chrs, &a.starts, &a.ends, &a.idxs, &ClusterOptions::default()).unwrap();
        assert_eq!(idxs.len(), a.len());

        let id_of = |row: u64| ids[idxs.iter().position(|&i| i == row).unwrap()];

        // Intervals in different clusters never overlap.
        for i in 0..a.len() {
            for j in 0..a.len() {
                if i != j && overlaps(a.row(i), a.row(j)) {
                    assert_eq!(id_of(i as u64), id_of(j as u64));
                }
            }
        }

        // Each cluster is connected through overlaps in sweep order.
        for w in 1..idxs.len() {
            if ids[w] == ids[w - 1] {
                let (g, s, _) = a.row(idxs[w] as usize);
                let max_end = (0..w)
                    .filter(|&p| ids[p] == ids[w])
                    .map(|p| a.row(idxs[p] as usize).2)
                    .max()
                    .unwrap();
                assert_eq!(a.row(idxs[w - 1] as usize).0, g);
                assert!(s < max_end);
            }
        }
    }
}

#[test]
fn subtraction_is_idempotent() {
    let mut rng = rng(3);
    for _ in 0..200 {
        let a = random_columns(&mut rng, 30, 2, 300);
        let b = random_columns(&mut rng, 30, 2, 300);

        let mut once = subtract(&a, &b);
        let fragments = Columns {
            chrs: once.iter().map(|f| a.chrs[f.0 as usize]).collect(),
            starts: once.iter().map(|f| f.1).collect(),
            ends: once.iter().map(|f| f.2).collect(),
            idxs: once.iter().map(|f| f.0).collect(),
        };
        let mut twice = subtract(&fragments, &b);
        once.sort_unstable();
        twice.sort_unstable();
        assert_eq!(twice, once);
    }
}

#[test]
fn subtraction_leaves_exactly_the_uncovered_bases() {
    let mut rng = rng(4);
    for _ in 0..200 {
        let a = random_columns(&mut rng, 20, 2, 200);
        let b = random_columns(&mut rng, 20, 2, 200);
        let result = subtract(&a, &b);

        for i in 0..a.len() {
            let (g, s, e) = a.row(i);
            let fragments: Vec<(i64, i64)> =
                result.iter().filter(|f| f.0 == i as u64).map(|f| (f.1, f.2)).collect();

            if s == e {
                let hit = (0..b.len()).any(|j| overlaps(a.row(i), b.row(j)));
                assert_eq!(fragments.is_empty(), hit);
                continue;
            }

            let mut kept = vec![false; (e - s) as usize];
            for w in fragments.windows(2) {
                assert!(w[0].1 < w[1].0, "fragments must be disjoint and not touching");
            }
            for (fs, fe) in fragments {
                assert!(s <= fs && fs < fe && fe <= e);
                for pos in fs..fe {
                    kept[(pos - s) as usize] = true;
                }
            }
            let expected: Vec<bool> = covered(&b, g, s, e).into_iter().map(|c| !c).collect();
            assert_eq!(kept, expected);
        }
    }
}

#[test]
fn subtraction_ignores_subtrahend_order_and_duplicates() {
    let mut rng = rng(5);
    for _ in 0..100 {
        let a = random_columns(&mut rng, 20, 2, 200);
        let b = random_columns(&mut rng, 20, 2, 200);

        let mut rows: Vec<(u32, i64, i64)> = (0..b.len()).map(|j| b.row(j)).collect();
        rows.reverse();
        rows.extend(rows.clone());
        let shuffled = Columns::from_rows(&rows);

        assert_eq!(subtract(&a, &b), subtract(&a, &shuffled));
    }
}

/// The rows of one group, keeping their original indices.
fn group_rows(columns: &Columns, group: u32) -> Columns {
    let keep: Vec<usize> = (0..columns.len()).filter(|&i| columns.chrs[i] == group).collect();
    Columns {
        chrs: keep.iter().map(|&i| columns.chrs[i]).collect(),
        starts: keep.iter().map(|&i| columns.starts[i]).collect(),
        ends: keep.iter().map(|&i| columns.ends[i]).collect(),
        idxs: keep.iter().map(|&i| columns.idxs[i]).collect(),
    }
}

fn strands(columns: &Columns) -> Vec<bool> {
    columns.chrs.iter().map(|g| g % 2 == 0).collect()
}

fn non_overlaps(a: &Columns, b: &Columns) -> Vec<u64> {
    sweep_line_non_overlaps(
        &a.chrs, &a.starts, &a.ends, &a.idxs,
        &b.chrs, &b.starts, &b.ends, &b.idxs,
        &OverlapOptions::default(),
    )
    .unwrap()
}

fn nearest(a: &Columns, b: &Columns, options: &NearestOptions) -> (Vec<u64>, Vec<u64>, Vec<i64>) {
    sweep_line_k_nearest(
        &a.chrs, &a.starts, &a.ends, &a.idxs,
        &b.chrs, &b.starts, &b.ends, &b.idxs,
        options,
    )
    .unwrap()
}

fn cluster(a: &Columns) -> (Vec<u64>, Vec<u64>) {
    sweep_line_cluster(&a.chrs, &a.starts, &a.ends, &a.idxs, &ClusterOptions::default()).unwrap()
}

fn merge(a: &Columns) -> (Vec<u64>, Vec<i64>, Vec<i64>, Vec<u64>) {
    sweep_line_merge(&a.chrs, &a.starts, &a.ends, &a.idxs, &MergeOptions::default()).unwrap()
}

fn spliced(a: &Columns) -> (Vec<u64>, Vec<i64>, Vec<i64>) {
    spliced_subseq(
        &a.chrs, &a.starts, &a.ends, &a.idxs,
        &strands(a),
        7,
        Some(-11),
        &SplicedOptions::default(),
    )
    .unwrap()
}

fn sort(a: &Columns) -> Vec<u64> {
    sort_order_idx(&a.chrs, &a.starts, &a.ends, &a.idxs).unwrap()
}

#[test]
fn operations_are_deterministic() {
    let groups = 24;
    let mut rng = rng(6);
    let a = random_columns_of_len(&mut rng, 12_000, groups, 1_000_000);
    let b = random_columns_of_len(&mut rng, 12_000, groups, 1_000_000);
    assert!(a.len() >= PARALLEL_THRESHOLD);
    let options = NearestOptions {
        k: 3,
        ..Default::default()
    };

    assert_eq!(nearest(&a, &b, &options), nearest(&a, &b, &options));
    assert_eq!(join(&a, &b), join(&a, &b));
    assert_eq!(non_overlaps(&a, &b), non_overlaps(&a, &b));
    assert_eq!(subtract(&a, &b), subtract(&a, &b));
    assert_eq!(cluster(&a), cluster(&a));
    assert_eq!(merge(&a), merge(&a));
    assert_eq!(spliced(&a), spliced(&a));
    assert_eq!(sort(&a), sort(&a));
}

#[test]
fn parallel_results_match_per_group_runs() {
    let groups = 24;
    let mut rng = rng(7);
    let a = random_columns_of_len(&mut rng, 12_000, groups, 1_000_000);
    let b = random_columns_of_len(&mut rng, 12_000, groups, 1_000_000);
    let options = NearestOptions {
        k: 2,
        ..Default::default()
    };

    let mut joined = Vec::new();
    let mut lonely = Vec::new();
    let mut fragments = Vec::new();
    let mut sorted = Vec::new();
    let (mut cluster_ids, mut cluster_idxs) = (Vec::new(), Vec::new());
    let mut merged = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    let mut trimmed = (Vec::new(), Vec::new(), Vec::new());
    let full_nearest = nearest(&a, &b, &options);

    for group in 0..groups {
        let ga = group_rows(&a, group);
        let gb = group_rows(&b, group);
        assert!(ga.len() + gb.len() < PARALLEL_THRESHOLD);

        joined.extend(join(&ga, &gb));
        lonely.extend(non_overlaps(&ga, &gb));
        fragments.extend(subtract(&ga, &gb));
        sorted.extend(sort(&ga));

        let offset = cluster_ids.last().map_or(0, |&id| id + 1);
        let (ids, idxs) = cluster(&ga);
        cluster_ids.extend(ids.into_iter().map(|id| id + offset));
        cluster_idxs.extend(idxs);

        let (idxs, starts, ends, counts) = merge(&ga);
        merged.0.extend(idxs);
        merged.1.extend(starts);
        merged.2.extend(ends);
        merged.3.extend(counts);

        let (idxs, starts, ends) = spliced(&ga);
        trimmed.0.extend(idxs);
        trimmed.1.extend(starts);
        trimmed.2.extend(ends);

        // Nearest slots follow input positions, so compare the group's slots.
        let (idx1, idx2, dist) = nearest(&ga, &gb, &options);
        let slots: Vec<usize> = (0..a.len())
            .filter(|&p| a.chrs[p] == group)
            .flat_map(|p| p * options.k..(p + 1) * options.k)
            .collect();
        assert_eq!(slots.iter().map(|&s| full_nearest.0[s]).collect::<Vec<_>>(), idx1);
        assert_eq!(slots.iter().map(|&s| full_nearest.1[s]).collect::<Vec<_>>(), idx2);
        assert_eq!(slots.iter().map(|&s| full_nearest.2[s]).collect::<Vec<_>>(), dist);
    }

    assert_eq!(join(&a, &b), joined);
    assert_eq!(non_overlaps(&a, &b), lonely);
    assert_eq!(subtract(&a, &b), fragments);
    assert_eq!(sort(&a), sorted);
    assert_eq!(cluster(&a), (cluster_ids, cluster_idxs));
    assert_eq!(merge(&a), merged);
    assert_eq!(spliced(&a), trimmed);
}

#[test]
fn spliced_subsequence_keeps_window_length() {
    // Forward transcript (1, 11) + (40, 60), 30 bases long.
    let (idxs, starts, ends) = spliced_subseq(
        &[0, 0],
        &[1, 40],
        &[11, 60],
        &[0, 1],
        &[true, true],
        3,
        Some(-3),
        &SplicedOptions::default(),
    )
    .unwrap();

    assert_eq!(idxs, vec![0, 1]);
    assert_eq!(starts, vec![4, 40]);
    assert_eq!(ends, vec![11, 57]);
    let length: i64 = starts.iter().zip(&ends).map(|(s, e)| e - s).sum();
    assert_eq!(length, 30 - 6);
}
