#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

//! Batch interval algebra over flat, parallel columns.
//!
//! Every operation takes one or two interval collections as parallel slices
//! (dense group code, half-open `[start, end)` coordinates, and the caller's
//! row index) and returns row indices, plus new coordinates where they change.
//! The caller gathers full records from its own table with those indices.
//!
//! Calls are stateless: each one validates its input, builds a sorted view
//! grouped by code, runs per-group sweeps and discards everything on return.
//!
//! ```
//! use ruranges::{sweep_line_overlaps, OverlapOptions};
//!
//! let (reads, genes) = sweep_line_overlaps(
//!     &[0, 0], &[0, 50], &[10, 60], &[0, 1],
//!     &[0], &[5], &[55], &[7],
//!     &OverlapOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(reads, vec![0, 1]);
//! assert_eq!(genes, vec![7, 7]);
//! ```

pub mod cluster;
pub mod error;
pub mod merge;
pub mod nearest;
#[cfg(feature = "python")]
pub mod numpy_bindings;
pub mod overlaps;
pub mod ruranges_structs;
pub mod sorts;
pub mod spliced_subsequence;
pub mod subtract;
pub mod validate;

pub use cluster::sweep_line_cluster;
pub use error::{Result, RurangesError};
pub use merge::sweep_line_merge;
pub use nearest::sweep_line_k_nearest;
pub use overlaps::{sweep_line_non_overlaps, sweep_line_overlaps};
pub use ruranges_structs::{
    ClusterOptions, Direction, DistanceConvention, MergeOptions, NearestOptions, OverlapOptions,
    OverlapPolicy, SplicedOptions, TieBreak, NO_DISTANCE, NO_MATCH,
};
pub use sorts::sort_order_idx;
pub use spliced_subsequence::spliced_subseq;
pub use subtract::sweep_line_subtract;
