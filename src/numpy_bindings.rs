use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::cluster::sweep_line_cluster;
use crate::error::RurangesError;
use crate::merge::sweep_line_merge;
use crate::nearest::sweep_line_k_nearest;
use crate::overlaps;
use crate::ruranges_structs::{
    ClusterOptions, Direction, DistanceConvention, MergeOptions, NearestOptions, OverlapOptions,
    OverlapPolicy, SplicedOptions, TieBreak,
};
use crate::sorts;
use crate::spliced_subsequence::spliced_subseq;
use crate::subtract::sweep_line_subtract;

impl From<RurangesError> for PyErr {
    fn from(err: RurangesError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pyfunction]
#[pyo3(signature = (chrs, starts, ends, idxs, chrs2, starts2, ends2, idxs2, slack=0))]
pub fn chromsweep_numpy(
    py: Python,
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    chrs2: PyReadonlyArray1<u32>,
    starts2: PyReadonlyArray1<i64>,
    ends2: PyReadonlyArray1<i64>,
    idxs2: PyReadonlyArray1<u64>,
    slack: i64,
) -> PyResult<(Py<PyArray1<u64>>, Py<PyArray1<u64>>)> {
    let result = overlaps::sweep_line_overlaps(
        chrs.as_slice()?,
        starts.as_slice()?,
        ends.as_slice()?,
        idxs.as_slice()?,
        chrs2.as_slice()?,
        starts2.as_slice()?,
        ends2.as_slice()?,
        idxs2.as_slice()?,
        &OverlapOptions { slack },
    )?;
    Ok((
        result.0.into_pyarray(py).to_owned().into(),
        result.1.into_pyarray(py).to_owned().into(),
    ))
}

#[pyfunction]
#[pyo3(signature = (chrs, starts, ends, idxs, chrs2, starts2, ends2, idxs2, slack=0))]
pub fn complement_overlaps_numpy(
    py: Python,
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    chrs2: PyReadonlyArray1<u32>,
    starts2: PyReadonlyArray1<i64>,
    ends2: PyReadonlyArray1<i64>,
    idxs2: PyReadonlyArray1<u64>,
    slack: i64,
) -> PyResult<Py<PyArray1<u64>>> {
    let result = overlaps::sweep_line_non_overlaps(
        chrs.as_slice()?,
        starts.as_slice()?,
        ends.as_slice()?,
        idxs.as_slice()?,
        chrs2.as_slice()?,
        starts2.as_slice()?,
        ends2.as_slice()?,
        idxs2.as_slice()?,
        &OverlapOptions { slack },
    )?;
    Ok(result.into_pyarray(py).to_owned().into())
}

#[pyfunction]
pub fn sort_intervals_numpy(
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    py: Python,
) -> PyResult<Py<PyArray1<u64>>> {
    let indexes = sorts::sort_order_idx(chrs.as_slice()?, starts.as_slice()?, ends.as_slice()?, idxs.as_slice()?)?;
    Ok(indexes.into_pyarray(py).to_owned().into())
}

fn parse_overlap_policy(name: &str) -> PyResult<OverlapPolicy> {
    match name {
        "include" => Ok(OverlapPolicy::Include),
        "ignore" => Ok(OverlapPolicy::Ignore),
        "exclude" => Ok(OverlapPolicy::Exclude),
        _ => Err(PyValueError::new_err(format!("unknown overlap policy: {name}"))),
    }
}

fn parse_tie_break(name: &str) -> PyResult<TieBreak> {
    match name {
        "batch" => Ok(TieBreak::BatchOrder),
        "upstream" => Ok(TieBreak::PreferUpstream),
        "downstream" => Ok(TieBreak::PreferDownstream),
        _ => Err(PyValueError::new_err(format!("unknown tie break: {name}"))),
    }
}

fn parse_direction(name: &str) -> PyResult<Direction> {
    match name {
        "any" => Ok(Direction::Any),
        "upstream" => Ok(Direction::Upstream),
        "downstream" => Ok(Direction::Downstream),
        _ => Err(PyValueError::new_err(format!("unknown direction: {name}"))),
    }
}

#[pyfunction]
#[pyo3(signature = (
    chrs, starts, ends, idxs, chrs2, starts2, ends2, idxs2,
    k=1, overlaps="include", tie_break="batch", direction="any", gap_distance=false, signed=false
))]
pub fn nearest_intervals_numpy(
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    chrs2: PyReadonlyArray1<u32>,
    starts2: PyReadonlyArray1<i64>,
    ends2: PyReadonlyArray1<i64>,
    idxs2: PyReadonlyArray1<u64>,
    k: usize,
    overlaps: &str,
    tie_break: &str,
    direction: &str,
    gap_distance: bool,
    signed: bool,
    py: Python,
) -> PyResult<(Py<PyArray1<u64>>, Py<PyArray1<u64>>, Py<PyArray1<i64>>)> {
    let options = NearestOptions {
        k,
        overlaps: parse_overlap_policy(overlaps)?,
        tie_break: parse_tie_break(tie_break)?,
        distance: if gap_distance {
            DistanceConvention::Gap
        } else {
            DistanceConvention::Bedtools
        },
        direction: parse_direction(direction)?,
        signed,
    };

    let (idx1, idx2, d) = sweep_line_k_nearest(
        chrs.as_slice()?,
        starts.as_slice()?,
        ends.as_slice()?,
        idxs.as_slice()?,
        chrs2.as_slice()?,
        starts2.as_slice()?,
        ends2.as_slice()?,
        idxs2.as_slice()?,
        &options,
    )?;
    Ok((
        idx1.into_pyarray(py).to_owned().into(),
        idx2.into_pyarray(py).to_owned().into(),
        d.into_pyarray(py).to_owned().into(),
    ))
}

#[pyfunction]
#[pyo3(signature = (chrs, starts, ends, idxs, slack=0))]
pub fn cluster_numpy(
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    slack: i64,
    py: Python,
) -> PyResult<(Py<PyArray1<u64>>, Py<PyArray1<u64>>)> {
    let (cluster_ids, indices) = sweep_line_cluster(
        chrs.as_slice()?,
        starts.as_slice()?,
        ends.as_slice()?,
        idxs.as_slice()?,
        &ClusterOptions { slack },
    )?;
    Ok((
        cluster_ids.into_pyarray(py).to_owned().into(),
        indices.into_pyarray(py).to_owned().into(),
    ))
}

#[pyfunction]
#[pyo3(signature = (chrs, starts, ends, idxs, slack=0))]
pub fn merge_numpy(
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    slack: i64,
    py: Python,
) -> PyResult<(Py<PyArray1<u64>>, Py<PyArray1<i64>>, Py<PyArray1<i64>>, Py<PyArray1<u64>>)> {
    let (indices, starts, ends, counts) = sweep_line_merge(
        chrs.as_slice()?,
        starts.as_slice()?,
        ends.as_slice()?,
        idxs.as_slice()?,
        &MergeOptions { slack },
    )?;
    Ok((
        indices.into_pyarray(py).to_owned().into(),
        starts.into_pyarray(py).to_owned().into(),
        ends.into_pyarray(py).to_owned().into(),
        counts.into_pyarray(py).to_owned().into(),
    ))
}

#[pyfunction]
pub fn subtract_numpy(
    py: Python,
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    chrs2: PyReadonlyArray1<u32>,
    starts2: PyReadonlyArray1<i64>,
    ends2: PyReadonlyArray1<i64>,
    idxs2: PyReadonlyArray1<u64>,
) -> PyResult<(Py<PyArray1<u64>>, Py<PyArray1<i64>>, Py<PyArray1<i64>>)> {
    let (outidx, outstarts, outends) = sweep_line_subtract(
        chrs.as_slice()?,
        starts.as_slice()?,
        ends.as_slice()?,
        idxs.as_slice()?,
        chrs2.as_slice()?,
        starts2.as_slice()?,
        ends2.as_slice()?,
        idxs2.as_slice()?,
    )?;
    Ok((
        outidx.into_pyarray(py).to_owned().into(),
        outstarts.into_pyarray(py).to_owned().into(),
        outends.into_pyarray(py).to_owned().into(),
    ))
}

#[pyfunction]
#[pyo3(signature = (chrs, starts, ends, idxs, strand_flags, start, end = None, force_plus_strand = false))]
pub fn spliced_subsequence_numpy(
    chrs: PyReadonlyArray1<u32>,
    starts: PyReadonlyArray1<i64>,
    ends: PyReadonlyArray1<i64>,
    idxs: PyReadonlyArray1<u64>,
    strand_flags: PyReadonlyArray1<bool>,
    start: i64,
    end: Option<i64>,
    force_plus_strand: bool,
    py: Python,
) -> PyResult<(Py<PyArray1<u64>>, Py<PyArray1<i64>>, Py<PyArray1<i64>>)> {
    let (outidx, outstarts, outends) = spliced_subseq(
        chrs.as_slice()?,
        starts.as_slice()?,
        ends.as_slice()?,
        idxs.as_slice()?,
        strand_flags.as_slice()?,
        start,
        end,
        &SplicedOptions { force_plus_strand },
    )?;
    Ok((
        outidx.into_pyarray(py).to_owned().into(),
        outstarts.into_pyarray(py).to_owned().into(),
        outends.into_pyarray(py).to_owned().into(),
    ))
}

#[pymodule]
fn ruranges(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(chromsweep_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(complement_overlaps_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(sort_intervals_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(nearest_intervals_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(cluster_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(merge_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(subtract_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(spliced_subsequence_numpy, m)?)?;
    Ok(())
}
