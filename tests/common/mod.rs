#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One interval collection as parallel columns, row indices equal to positions.
#[derive(Debug, Clone)]
pub struct Columns {
    pub chrs: Vec<u32>,
    pub starts: Vec<i64>,
    pub ends: Vec<i64>,
    pub idxs: Vec<u64>,
}

impl Columns {
    pub fn from_rows(rows: &[(u32, i64, i64)]) -> Self {
        Columns {
            chrs: rows.iter().map(|r| r.0).collect(),
            starts: rows.iter().map(|r| r.1).collect(),
            ends: rows.iter().map(|r| r.2).collect(),
            idxs: (0..rows.len() as u64).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chrs.len()
    }

    pub fn row(&self, i: usize) -> (u32, i64, i64) {
        (self.chrs[i], self.starts[i], self.ends[i])
    }
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random intervals on `groups` groups, including zero-length ones.
pub fn random_columns(rng: &mut StdRng, max_len: usize, groups: u32, span: i64) -> Columns {
    let n = rng.gen_range(0..=max_len);
    random_columns_of_len(rng, n, groups, span)
}

pub fn random_columns_of_len(rng: &mut StdRng, n: usize, groups: u32, span: i64) -> Columns {
    let rows: Vec<(u32, i64, i64)> = (0..n)
        .map(|_| {
            let start = rng.gen_range(0..span);
            let length = if rng.gen_bool(0.1) { 0 } else { rng.gen_range(1..span / 4) };
            (rng.gen_range(0..groups), start, start + length)
        })
        .collect();
    Columns::from_rows(&rows)
}

pub fn overlaps(a: (u32, i64, i64), b: (u32, i64, i64)) -> bool {
    a.0 == b.0 && a.1 < b.2 && b.1 < a.2
}

/// Bases `[start, end)` of a group covered by at least one interval.
pub fn covered(columns: &Columns, group: u32, start: i64, end: i64) -> Vec<bool> {
    let mut mask = vec![false; (end - start) as usize];
    for i in 0..columns.len() {
        let (g, s, e) = columns.row(i);
        if g != group {
            continue;
        }
        for pos in s.max(start)..e.min(end) {
            mask[(pos - start) as usize] = true;
        }
    }
    mask
}
