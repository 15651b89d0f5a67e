//! Reduction drivers built from `reduce` and `combine`.
//!
//! The statistical core does not decide how a sample stream is split up.
//! These drivers are small host-side stand-ins for the engine that does:
//! they partition a slice, give every partition its own accumulator, and
//! merge the partial states with [`WelfordOps::combine`]. The answer does not
//! depend on the strategy; only the rounding profile does.
//!
//! # Feature Flag
//!
//! [`fold_parallel`] uses Rayon when the `parallel` feature is enabled (the
//! default). Without it the function degrades to [`fold_partitioned`].
//!
//! # Example
//!
//! ```
//! use fast_welford::reduction::{fold_sequential, fold_tree};
//! use fast_welford::welford::WelfordOps;
//!
//! let ops: WelfordOps<f64> = WelfordOps::new(true, false);
//! let data: Vec<f64> = (1..=1000).map(f64::from).collect();
//!
//! let sequential = fold_sequential(&ops, &data);
//! let tree = fold_tree(&ops, &data, 16).unwrap();
//!
//! assert_eq!(sequential.count(), tree.count());
//! assert!((ops.project(sequential) - ops.project(tree)).abs() < 1e-6);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::lanes::{lockstep_fold, LanePrimitives};
use crate::traits::{validate_partitions, SampleElement, ValidatedInput};
use crate::welford::{StatSummary, Welford, WelfordOps, WelfordState};

/// How a slice is partitioned and recombined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReductionStrategy {
    /// One accumulator, left to right.
    #[default]
    Sequential,
    /// Recursive pairwise halving down to leaves of at most `leaf_size` samples.
    Tree {
        /// Largest leaf folded sequentially.
        leaf_size: usize,
    },
    /// `partitions` contiguous chunks combined left to right.
    Partitioned {
        /// Number of chunks.
        partitions: usize,
    },
    /// Rayon work-stealing over chunks of `min_chunk` samples.
    Parallel {
        /// Chunk size handed to each task.
        min_chunk: usize,
    },
    /// A lockstep lane group of `width` lanes.
    Lockstep {
        /// Number of lanes (power of two).
        width: usize,
    },
}

impl ReductionStrategy {
    /// Short lowercase name, as accepted by the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Tree { .. } => "tree",
            Self::Partitioned { .. } => "partitioned",
            Self::Parallel { .. } => "parallel",
            Self::Lockstep { .. } => "lockstep",
        }
    }
}

/// Folds every sample into a single accumulator.
#[must_use]
pub fn fold_sequential<T, P>(ops: &WelfordOps<T, P>, data: &[T]) -> WelfordState
where
    T: SampleElement,
    P: LanePrimitives,
{
    data.iter()
        .fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x))
}

/// Merges a set of partial states left to right.
#[must_use]
pub fn combine_all<T, P>(ops: &WelfordOps<T, P>, states: &[WelfordState]) -> WelfordState
where
    T: SampleElement,
    P: LanePrimitives,
{
    states
        .iter()
        .fold(WelfordState::new(), |acc, &s| ops.combine(acc, s))
}

/// Pairwise tree reduction.
///
/// The slice is halved recursively until a piece has at most `leaf_size`
/// samples; leaves are folded sequentially and siblings combined on the way
/// back up.
///
/// # Errors
///
/// Returns `Error::InvalidPartition` if `leaf_size` is zero.
pub fn fold_tree<T, P>(ops: &WelfordOps<T, P>, data: &[T], leaf_size: usize) -> Result<WelfordState>
where
    T: SampleElement,
    P: LanePrimitives,
{
    validate_partitions(leaf_size)?;
    Ok(tree(ops, data, leaf_size))
}

fn tree<T, P>(ops: &WelfordOps<T, P>, data: &[T], leaf_size: usize) -> WelfordState
where
    T: SampleElement,
    P: LanePrimitives,
{
    if data.len() <= leaf_size {
        return fold_sequential(ops, data);
    }
    let (left, right) = data.split_at(data.len() / 2);
    ops.combine(tree(ops, left, leaf_size), tree(ops, right, leaf_size))
}

/// Folds `partitions` contiguous chunks privately, then combines them in order.
///
/// Asking for more partitions than samples is allowed; the surplus partitions
/// are simply empty.
///
/// # Errors
///
/// Returns `Error::InvalidPartition` if `partitions` is zero.
pub fn fold_partitioned<T, P>(
    ops: &WelfordOps<T, P>,
    data: &[T],
    partitions: usize,
) -> Result<WelfordState>
where
    T: SampleElement,
    P: LanePrimitives,
{
    validate_partitions(partitions)?;
    let chunk_size = data.len().div_ceil(partitions).max(1);
    let states: Vec<WelfordState> = data
        .chunks(chunk_size)
        .map(|chunk| fold_sequential(ops, chunk))
        .collect();
    Ok(combine_all(ops, &states))
}

/// Folds chunks of `min_chunk` samples on the Rayon thread pool.
///
/// Inputs shorter than two chunks are folded sequentially on the calling
/// thread.
///
/// # Errors
///
/// Returns `Error::InvalidPartition` if `min_chunk` is zero.
#[cfg(feature = "parallel")]
pub fn fold_parallel<T, P>(
    ops: &WelfordOps<T, P>,
    data: &[T],
    min_chunk: usize,
) -> Result<WelfordState>
where
    T: SampleElement,
    P: LanePrimitives,
{
    validate_partitions(min_chunk)?;
    if data.len() < min_chunk.saturating_mul(2) {
        log::debug!(
            "{} samples below parallel threshold, folding sequentially",
            data.len()
        );
        return Ok(fold_sequential(ops, data));
    }
    Ok(data
        .par_chunks(min_chunk)
        .map(|chunk| fold_sequential(ops, chunk))
        .reduce(WelfordState::new, |a, b| ops.combine(a, b)))
}

/// Sequential version when the parallel feature is disabled.
///
/// # Errors
///
/// Returns `Error::InvalidPartition` if `min_chunk` is zero.
#[cfg(not(feature = "parallel"))]
pub fn fold_parallel<T, P>(
    ops: &WelfordOps<T, P>,
    data: &[T],
    min_chunk: usize,
) -> Result<WelfordState>
where
    T: SampleElement,
    P: LanePrimitives,
{
    validate_partitions(min_chunk)?;
    log::warn!("built without the `parallel` feature, using partitioned fold");
    fold_partitioned(ops, data, data.len().div_ceil(min_chunk).max(1))
}

/// Folds `data` with the given strategy.
///
/// # Errors
///
/// Returns an error if the strategy parameters are invalid.
pub fn fold_with<T, P>(
    ops: &WelfordOps<T, P>,
    data: &[T],
    strategy: ReductionStrategy,
) -> Result<WelfordState>
where
    T: SampleElement,
    P: LanePrimitives,
{
    log::debug!(
        "folding {} samples with {} strategy",
        data.len(),
        strategy.name()
    );
    match strategy {
        ReductionStrategy::Sequential => Ok(fold_sequential(ops, data)),
        ReductionStrategy::Tree { leaf_size } => fold_tree(ops, data, leaf_size),
        ReductionStrategy::Partitioned { partitions } => fold_partitioned(ops, data, partitions),
        ReductionStrategy::Parallel { min_chunk } => fold_parallel(ops, data, min_chunk),
        ReductionStrategy::Lockstep { width } => lockstep_fold(ops, data, width),
    }
}

/// Arithmetic mean of `data`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `data` is empty.
pub fn mean<T: SampleElement>(data: &[T]) -> Result<T> {
    data.validate_not_empty()?;
    let ops = WelfordOps::<T>::default();
    Ok(T::demote(fold_sequential(&ops, data).mean()))
}

/// Variance of `data`; `NaN` when undefined for the sample count.
#[must_use]
pub fn variance<T: SampleElement>(data: &[T], unbiased: bool) -> T {
    Welford::new().unbiased(unbiased).compute(data)
}

/// Standard deviation of `data`; `NaN` when undefined for the sample count.
#[must_use]
pub fn stddev<T: SampleElement>(data: &[T], unbiased: bool) -> T {
    Welford::new().unbiased(unbiased).take_sqrt(true).compute(data)
}

/// Count, mean, variance and standard deviation of `data` in one pass.
#[must_use]
pub fn summarize<T: SampleElement>(data: &[T], unbiased: bool) -> StatSummary<T> {
    let ops = WelfordOps::<T>::new(unbiased, false);
    ops.summarize(fold_sequential(&ops, data))
}
