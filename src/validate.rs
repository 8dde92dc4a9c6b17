use rustc_hash::FxHashMap;

use crate::error::{Result, RurangesError};
use crate::ruranges_structs::{MAX_COORDINATE, NO_MATCH};

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(RurangesError::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_coordinate(position: usize, value: i64) -> Result<()> {
    if !(-MAX_COORDINATE..=MAX_COORDINATE).contains(&value) {
        return Err(RurangesError::CoordinateOutOfRange { position, value });
    }
    Ok(())
}

/// Checks one interval collection: equal lengths, `start <= end`, and
/// coordinates inside the supported range.
pub fn check_columns(groups: &[u32], starts: &[i64], ends: &[i64], idxs: &[u64]) -> Result<()> {
    let n = groups.len();
    check_len("starts", n, starts.len())?;
    check_len("ends", n, ends.len())?;
    check_len("idxs", n, idxs.len())?;

    for (position, (&start, &end)) in starts.iter().zip(ends).enumerate() {
        check_coordinate(position, start)?;
        check_coordinate(position, end)?;
        if start > end {
            return Err(RurangesError::InvalidInterval {
                position,
                start,
                end,
            });
        }
    }
    Ok(())
}

pub fn check_slack(slack: i64) -> Result<()> {
    if !(0..=MAX_COORDINATE).contains(&slack) {
        return Err(RurangesError::InvalidSlack(slack));
    }
    Ok(())
}

pub fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(RurangesError::InvalidK);
    }
    Ok(())
}

/// Indices reported back as nearest neighbors must not collide with [`NO_MATCH`].
pub fn check_reportable_idxs(idxs: &[u64]) -> Result<()> {
    match idxs.iter().position(|&i| i == NO_MATCH) {
        Some(position) => Err(RurangesError::ReservedIndex { position }),
        None => Ok(()),
    }
}

/// A strand flag per interval, uniform within each group.
pub fn check_strands(groups: &[u32], strand_flags: &[bool]) -> Result<()> {
    check_len("strand_flags", groups.len(), strand_flags.len())?;

    let mut seen: FxHashMap<u32, bool> = FxHashMap::default();
    for (&group, &forward) in groups.iter().zip(strand_flags) {
        if *seen.entry(group).or_insert(forward) != forward {
            return Err(RurangesError::MixedStrand { group });
        }
    }
    Ok(())
}

/// Rejects out-of-range bounds and windows that are empty for every feature
/// length: both bounds counted from the same end and `from > to`.
pub fn check_window(from: i64, to: Option<i64>) -> Result<()> {
    let range = -MAX_COORDINATE..=MAX_COORDINATE;
    if !range.contains(&from) {
        return Err(RurangesError::WindowOutOfRange(from));
    }
    if let Some(to) = to {
        if !range.contains(&to) {
            return Err(RurangesError::WindowOutOfRange(to));
        }
        if (from < 0) == (to < 0) && from > to {
            return Err(RurangesError::MalformedWindow { from, to });
        }
    }
    Ok(())
}
