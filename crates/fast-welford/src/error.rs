//! Error types for fast-welford.
//!
//! The statistical core (`reduce`, `combine`, `project`, `cross_lane_combine`)
//! is total and never fails. Errors only come from the drivers and
//! configuration layered on top of it.

use thiserror::Error;

/// The main error type for fast-welford operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input data series is empty.
    ///
    /// Returned by drivers whose result has no meaning without samples
    /// (e.g. [`mean`](crate::reduction::mean)).
    #[error("empty input: no data provided")]
    EmptyInput,

    /// A partition count or leaf size is invalid.
    #[error("invalid partition {partitions}: {reason}")]
    InvalidPartition {
        /// The invalid partition value that was provided.
        partitions: usize,
        /// Description of why the value is invalid.
        reason: &'static str,
    },

    /// A lane group width is not usable for lockstep reduction.
    #[error("invalid lane group width {width}: {reason}")]
    InvalidLaneGroup {
        /// The requested number of lanes.
        width: usize,
        /// Description of why the width is invalid.
        reason: &'static str,
    },

    /// A lane group was handed the wrong number of partial states.
    #[error("lane count mismatch: group has {expected} lanes, got {actual} states")]
    LaneCountMismatch {
        /// Number of lanes in the group.
        expected: usize,
        /// Number of partial states provided.
        actual: usize,
    },
}

/// Convenience type alias for Results using the fast-welford Error type.
pub type Result<T> = std::result::Result<T, Error>;
