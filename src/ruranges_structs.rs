use std::ops::Range;

/// Row index reported in a nearest-neighbor slot with no match.
/// Bit-identical to `-1` when the column is read back as `int64`.
pub const NO_MATCH: u64 = u64::MAX;

/// Distance reported in a nearest-neighbor slot with no match.
pub const NO_DISTANCE: i64 = i64::MAX;

/// Largest absolute coordinate accepted by the engines. Keeps every sum and
/// difference computed internally inside `i64`.
pub const MAX_COORDINATE: i64 = i64::MAX / 4;

/// Combined input size from which per-group work is fanned out with rayon.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// A half-open interval `[start, end)` tagged with its group code and the
/// caller's row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub group: u32,
    pub start: i64,
    pub end: i64,
    pub idx: u64,
}

/// A contiguous run of one group inside a sorted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRun {
    pub group: u32,
    pub range: Range<usize>,
}

/// The runs of one group in two batches. `b` is empty when the group is
/// absent from the second batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPair {
    pub group: u32,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

/// A maximal merged span of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedSpan {
    pub start: i64,
    pub end: i64,
    /// Index of the last interval (in sorted order) that joined the span.
    pub idx: u64,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClusterOptions {
    /// An interval joins the open cluster when `start < max_end + slack`.
    pub slack: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOptions {
    pub slack: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapOptions {
    /// Both ends of every interval of the first batch are widened by `slack`.
    pub slack: i64,
}

/// How overlapping intervals take part in a nearest-neighbor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Overlapping intervals are neighbors at distance 0.
    #[default]
    Include,
    /// Overlapping intervals are skipped and the search continues outward.
    Ignore,
    /// A query interval that overlaps anything gets no neighbors at all.
    Exclude,
}

/// Order among candidates at equal distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Sorted-batch order of the second collection.
    #[default]
    BatchOrder,
    PreferUpstream,
    PreferDownstream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceConvention {
    /// `gap + 1` for non-overlapping pairs, so bookended intervals are 1 apart.
    #[default]
    Bedtools,
    /// The raw half-open gap, bookended intervals are 0 apart.
    Gap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Any,
    Upstream,
    Downstream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearestOptions {
    pub k: usize,
    pub overlaps: OverlapPolicy,
    pub tie_break: TieBreak,
    pub distance: DistanceConvention,
    pub direction: Direction,
    /// Report upstream neighbors with a negative distance.
    pub signed: bool,
}

impl Default for NearestOptions {
    fn default() -> Self {
        Self {
            k: 1,
            overlaps: OverlapPolicy::default(),
            tie_break: TieBreak::default(),
            distance: DistanceConvention::default(),
            direction: Direction::default(),
            signed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplicedOptions {
    /// Treat every feature as forward strand.
    pub force_plus_strand: bool,
}
