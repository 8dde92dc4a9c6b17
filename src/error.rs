use thiserror::Error;

/// Contract violations detected before any engine does algorithmic work.
///
/// Empty inputs and groups without a counterpart are not errors; they produce
/// empty or sentinel-filled output instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RurangesError {
    #[error("{what} has length {found}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("interval at position {position} has start {start} > end {end}")]
    InvalidInterval { position: usize, start: i64, end: i64 },

    #[error("coordinate {value} at position {position} is outside the supported range")]
    CoordinateOutOfRange { position: usize, value: i64 },

    #[error("k must be positive")]
    InvalidK,

    #[error("slack must be between 0 and the supported coordinate range, got {0}")]
    InvalidSlack(i64),

    #[error("window bound {0} is outside the supported range")]
    WindowOutOfRange(i64),

    #[error("malformed window: from {from} > to {to}")]
    MalformedWindow { from: i64, to: i64 },

    #[error("group {group} mixes forward and reverse strand intervals")]
    MixedStrand { group: u32 },

    #[error("index at position {position} collides with the no-match sentinel")]
    ReservedIndex { position: usize },
}

pub type Result<T> = std::result::Result<T, RurangesError>;
