//! Options builder for Welford reductions.

use super::{WelfordOps, WelfordState};
use crate::error::Result;
use crate::reduction::{fold_with, ReductionStrategy};
use crate::traits::SampleElement;

/// Configuration for a Welford reduction.
///
/// Exactly two flags are recognised: `unbiased` (Bessel's correction) and
/// `take_sqrt` (standard deviation instead of variance). The default is the
/// population variance.
///
/// # Example
///
/// ```
/// use fast_welford::Welford;
///
/// let data = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
///
/// assert!((Welford::new().compute(&data) - 2.0).abs() < 1e-12);
/// assert!((Welford::sample_variance().compute(&data) - 2.5).abs() < 1e-12);
///
/// let std = Welford::new().unbiased(true).take_sqrt(true).compute(&data);
/// assert!((std - 1.5811388300841898).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Welford {
    unbiased: bool,
    take_sqrt: bool,
}

impl Welford {
    /// Creates the default configuration (population variance).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unbiased: false,
            take_sqrt: false,
        }
    }

    /// Population variance (divide by `n`).
    #[must_use]
    pub const fn variance() -> Self {
        Self::new()
    }

    /// Sample variance (divide by `n - 1`).
    #[must_use]
    pub const fn sample_variance() -> Self {
        Self::new().unbiased(true)
    }

    /// Population standard deviation.
    #[must_use]
    pub const fn stddev() -> Self {
        Self::new().take_sqrt(true)
    }

    /// Sample standard deviation.
    #[must_use]
    pub const fn sample_stddev() -> Self {
        Self::new().unbiased(true).take_sqrt(true)
    }

    /// Sets Bessel's correction.
    ///
    /// Default: false
    #[must_use]
    pub const fn unbiased(mut self, unbiased: bool) -> Self {
        self.unbiased = unbiased;
        self
    }

    /// Sets whether the standard deviation is returned.
    ///
    /// Default: false
    #[must_use]
    pub const fn take_sqrt(mut self, take_sqrt: bool) -> Self {
        self.take_sqrt = take_sqrt;
        self
    }

    /// Returns the `unbiased` flag.
    #[must_use]
    pub const fn get_unbiased(&self) -> bool {
        self.unbiased
    }

    /// Returns the `take_sqrt` flag.
    #[must_use]
    pub const fn get_take_sqrt(&self) -> bool {
        self.take_sqrt
    }

    /// Builds the reduction operations for element type `T`.
    #[must_use]
    pub const fn ops<T: SampleElement>(&self) -> WelfordOps<T> {
        WelfordOps::new(self.unbiased, self.take_sqrt)
    }

    /// Folds `data` sequentially and projects the configured statistic.
    ///
    /// Returns `NaN` when the statistic is undefined for `data.len()` samples.
    #[must_use]
    pub fn compute<T: SampleElement>(&self, data: &[T]) -> T {
        let ops = self.ops::<T>();
        let state = data
            .iter()
            .fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x));
        ops.project(state)
    }

    /// Folds `data` with the given strategy and projects the configured statistic.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy parameters are invalid (zero
    /// partitions or leaf size, or an unusable lane width).
    pub fn compute_with<T: SampleElement>(
        &self,
        data: &[T],
        strategy: ReductionStrategy,
    ) -> Result<T> {
        let ops = self.ops::<T>();
        Ok(ops.project(fold_with(&ops, data, strategy)?))
    }
}
