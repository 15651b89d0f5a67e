//! Utility functions for fast-welford.
//!
//! # Floating-Point Comparison
//!
//! Results that went through different reduction trees differ in their last
//! bits, so exact equality is the wrong check. This module provides
//! tolerance-based comparisons plus a textbook two-pass variance to audit the
//! streaming result against.
//!
//! # Example
//!
//! ```
//! use fast_welford::utils::{approx_eq_relative, two_pass_variance};
//! use fast_welford::Welford;
//!
//! let data = [10.5_f64, 11.25, 9.75, 10.0];
//! let streaming = Welford::sample_variance().compute(&data);
//! assert!(approx_eq_relative(streaming, two_pass_variance(&data, true), 1e-12));
//! ```

use crate::traits::SampleElement;

/// Standard epsilon for high-precision floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for results accumulated over many operations or in `f32`.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Approximate equality check for floating-point values.
///
/// Returns `true` if `a` and `b` are within `tolerance` of each other,
/// or if both are NaN (for testing convenience).
///
/// # Example
///
/// ```
/// use fast_welford::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
/// assert!(!approx_eq(1.0, 2.0, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: SampleElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Relative approximate equality check for floating-point values.
///
/// Returns `true` if the relative difference between `a` and `b` is less than
/// `rel_tolerance`, or if both are NaN.
///
/// # Example
///
/// ```
/// use fast_welford::utils::approx_eq_relative;
///
/// assert!(approx_eq_relative(1e10, 1e10 + 1.0, 1e-9));
/// assert!(approx_eq_relative(1e-10, 1.000000001e-10, 1e-8));
/// ```
#[inline]
#[must_use]
pub fn approx_eq_relative<T: SampleElement>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }

    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());

    if max_abs == T::zero() {
        return diff == T::zero();
    }

    diff / max_abs < rel_tolerance
}

/// Reference variance computed with two passes over `data`.
///
/// First the mean, then the sum of squared deviations from it, both in
/// `f64`. Needs the whole slice in memory, which is exactly what the
/// streaming accumulator avoids; it is kept for tests and benchmarks.
/// Returns `NaN` under the same sample-count rules as `project`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn two_pass_variance<T: SampleElement>(data: &[T], unbiased: bool) -> f64 {
    let n = data.len();
    let divisor = n.saturating_sub(usize::from(unbiased));
    if n == 0 || divisor == 0 {
        return f64::NAN;
    }
    let mean = data.iter().map(|&x| x.promote()).sum::<f64>() / n as f64;
    let ss: f64 = data
        .iter()
        .map(|&x| {
            let d = x.promote() - mean;
            d * d
        })
        .sum();
    ss / divisor as f64
}
