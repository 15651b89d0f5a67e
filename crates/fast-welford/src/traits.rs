//! Core traits for fast-welford numeric operations.
//!
//! The primary trait is [`SampleElement`], the element type of a sample stream.
//! Samples are stored in their own type (`f32` or `f64`) but every accumulator
//! works in `f64`, so the trait is mostly about moving values across that
//! boundary.
//!
//! # Example
//!
//! ```
//! use fast_welford::traits::SampleElement;
//!
//! fn widened_sum<T: SampleElement>(data: &[T]) -> f64 {
//!     data.iter().map(|&x| x.promote()).sum()
//! }
//!
//! let data = vec![0.1_f32, 0.2, 0.3];
//! assert!((widened_sum(&data) - 0.6).abs() < 1e-6);
//! ```

use std::fmt::Debug;

use num_traits::{Float, NumCast, ToPrimitive};

use crate::error::{Error, Result};

/// A trait for types that can be folded into a Welford accumulator.
///
/// # Type Bounds
///
/// - `Float`: Standard floating-point operations (NaN handling, infinity, arithmetic)
/// - `NumCast`: Conversion to and from the `f64` accumulator type
/// - `Copy + Default + Debug`: plain value semantics
/// - `Send + Sync + 'static`: samples can be handed to worker threads and lanes
pub trait SampleElement: Float + NumCast + Copy + Default + Debug + Send + Sync + 'static {
    /// Promotes a sample to the `f64` accumulator precision.
    ///
    /// Never fails for IEEE float types; a value that cannot be represented
    /// becomes `NaN` and poisons the accumulator like any other non-finite
    /// sample.
    #[inline]
    #[must_use]
    fn promote(self) -> f64 {
        <Self as ToPrimitive>::to_f64(&self).unwrap_or(f64::NAN)
    }

    /// Narrows an `f64` result back to the sample element type.
    ///
    /// Out-of-range magnitudes saturate to infinity; a failed cast yields `NaN`.
    #[inline]
    #[must_use]
    fn demote(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }
}

// Blanket implementation for all types that satisfy the bounds
impl<T: Float + NumCast + Copy + Default + Debug + Send + Sync + 'static> SampleElement for T {}

/// Trait for validating input data before a driver runs.
pub trait ValidatedInput {
    /// The element type of the series.
    type Element: SampleElement;

    /// Returns the length of the series.
    fn len(&self) -> usize;

    /// Returns true if the series is empty.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates that the series is not empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the series is empty.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }
}

impl<T: SampleElement> ValidatedInput for [T] {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }
}

/// Validates a partition count or leaf size used by the tree-shaped drivers.
///
/// # Errors
///
/// Returns `Error::InvalidPartition` if `partitions` is zero.
#[inline]
pub const fn validate_partitions(partitions: usize) -> Result<()> {
    if partitions == 0 {
        Err(Error::InvalidPartition {
            partitions,
            reason: "must be at least 1",
        })
    } else {
        Ok(())
    }
}
