//! Reduction operations over [`WelfordState`].

use std::fmt;
use std::marker::PhantomData;

use super::WelfordState;
use crate::lanes::{HostLanes, LanePrimitives};
use crate::traits::SampleElement;

/// Stateless reduction policy for Welford mean/variance.
///
/// Configured once with two flags and then shared by reference across every
/// `reduce`/`combine`/`project` call of a reduction. It holds no other data.
///
/// # Type Parameters
///
/// - `T`: the sample element type (`f32` or `f64`). Accumulation is always `f64`.
/// - `P`: the platform primitives used for `sqrt` and lane exchange. Defaults
///   to [`HostLanes`]; a lockstep lane group substitutes its own handle type.
///
/// # Example
///
/// ```
/// use fast_welford::welford::{WelfordOps, WelfordState};
///
/// let ops: WelfordOps<f64> = WelfordOps::new(true, false);
///
/// // Two workers accumulate disjoint halves...
/// let left = [1.0, 2.0].iter().fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x));
/// let right = [3.0, 4.0, 5.0].iter().fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x));
///
/// // ...and the merged state answers as if one worker had seen everything.
/// let merged = ops.combine(left, right);
/// assert!((ops.project(merged) - 2.5).abs() < 1e-12);
/// ```
pub struct WelfordOps<T, P = HostLanes> {
    unbiased: bool,
    take_sqrt: bool,
    _marker: PhantomData<fn(T) -> P>,
}

impl<T, P> Clone for WelfordOps<T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, P> Copy for WelfordOps<T, P> {}

impl<T, P> fmt::Debug for WelfordOps<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WelfordOps")
            .field("unbiased", &self.unbiased)
            .field("take_sqrt", &self.take_sqrt)
            .finish()
    }
}

impl<T, P> Default for WelfordOps<T, P> {
    /// Population (biased) variance.
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl<T, P> WelfordOps<T, P> {
    /// Creates the operations policy.
    ///
    /// * `unbiased` - divide by `count - 1` (Bessel's correction) instead of `count`
    /// * `take_sqrt` - project the standard deviation instead of the variance
    #[must_use]
    pub const fn new(unbiased: bool, take_sqrt: bool) -> Self {
        Self {
            unbiased,
            take_sqrt,
            _marker: PhantomData,
        }
    }

    /// Whether Bessel's correction is applied.
    #[must_use]
    pub const fn unbiased(&self) -> bool {
        self.unbiased
    }

    /// Whether `project` returns the standard deviation.
    #[must_use]
    pub const fn take_sqrt(&self) -> bool {
        self.take_sqrt
    }

    /// Rebinds the same policy to different platform primitives.
    #[must_use]
    pub const fn with_lanes<Q>(self) -> WelfordOps<T, Q> {
        WelfordOps::new(self.unbiased, self.take_sqrt)
    }
}

#[allow(clippy::cast_precision_loss)]
impl<T: SampleElement, P: LanePrimitives> WelfordOps<T, P> {
    /// Folds one sample into `acc`.
    ///
    /// Welford's online update. NaN and infinite samples propagate through
    /// IEEE arithmetic and poison the returned state.
    #[inline]
    #[must_use]
    pub fn reduce(&self, acc: WelfordState, data: T) -> WelfordState {
        let x = data.promote();
        let count = acc.count() + 1;
        let delta = x - acc.mean();
        let mean = acc.mean() + delta / count as f64;
        let new_delta = x - mean;
        WelfordState::from_parts(mean, acc.m2() + delta * new_delta, count)
    }

    /// Merges two independently accumulated states (Chan et al.).
    ///
    /// The result is the state a single accumulator would hold after seeing
    /// the samples of both `a` and `b`, in any order. An empty operand is the
    /// identity and the other operand is returned unchanged.
    #[inline]
    #[must_use]
    pub fn combine(&self, a: WelfordState, b: WelfordState) -> WelfordState {
        if a.count() == 0 {
            return b;
        }
        if b.count() == 0 {
            return a;
        }
        let delta = b.mean() - a.mean();
        let count = a.count() + b.count();
        let nb_over_n = b.count() as f64 / count as f64;
        WelfordState::from_parts(
            a.mean() + delta * nb_over_n,
            a.m2() + b.m2() + delta * delta * a.count() as f64 * nb_over_n,
            count,
        )
    }

    /// Extracts the configured statistic from a final state.
    ///
    /// Returns `NaN` when the statistic is undefined: no samples, or a single
    /// sample with `unbiased` set. A legitimate zero variance is returned as
    /// zero.
    #[inline]
    #[must_use]
    pub fn project(&self, acc: WelfordState) -> T {
        let divisor = acc
            .count()
            .checked_sub(u64::from(self.unbiased))
            .unwrap_or(0);
        if divisor == 0 {
            return T::nan();
        }
        let var = acc.m2() / divisor as f64;
        T::demote(if self.take_sqrt { P::sqrt(var) } else { var })
    }

    /// Fetches the state held by the lane `offset` positions above the caller.
    ///
    /// Each of the three fields is moved with its own lane shuffle.
    #[inline]
    #[must_use]
    pub fn shuffle_down(&self, acc: WelfordState, offset: u32, lanes: &P) -> WelfordState {
        WelfordState::from_parts(
            lanes.shuffle_down_f64(acc.mean(), offset),
            lanes.shuffle_down_f64(acc.m2(), offset),
            lanes.shuffle_down_u64(acc.count(), offset),
        )
    }

    /// One step of a lockstep lane-shuffle reduction.
    ///
    /// Must be called by every lane of the group with the same `offset`,
    /// for `offset = width / 2, width / 4, ..., 1`. After the last step lane 0
    /// holds the state of the whole group.
    ///
    /// A lane whose source `lane + offset` is outside the group reads back its
    /// own state and merges it with itself. With [`HostLanes`], the default
    /// `P`, every offset is out of range, so the call doubles `count` and `m2`.
    /// Host code merging two partial states should call
    /// [`combine`](Self::combine) instead.
    ///
    /// ```
    /// use fast_welford::{HostLanes, WelfordOps, WelfordState};
    ///
    /// let ops: WelfordOps<f64> = WelfordOps::default();
    /// let acc = ops.reduce(ops.reduce(WelfordState::new(), 2.0), 4.0);
    ///
    /// let self_merged = ops.cross_lane_combine(acc, 1, &HostLanes);
    /// assert_eq!(self_merged.count(), 2 * acc.count());
    /// assert_eq!(self_merged.m2(), 2.0 * acc.m2());
    /// ```
    #[inline]
    #[must_use]
    pub fn cross_lane_combine(&self, acc: WelfordState, offset: u32, lanes: &P) -> WelfordState {
        let remote = self.shuffle_down(acc, offset, lanes);
        self.combine(acc, remote)
    }

    /// Summarises a state with mean, variance and standard deviation.
    ///
    /// Variance and standard deviation follow the `unbiased` flag; the
    /// `take_sqrt` flag is ignored since both are reported.
    #[must_use]
    pub fn summarize(&self, acc: WelfordState) -> StatSummary<T> {
        let variance: T = WelfordOps::<T, P>::new(self.unbiased, false).project(acc);
        let stddev: T = WelfordOps::<T, P>::new(self.unbiased, true).project(acc);
        StatSummary {
            count: acc.count(),
            mean: if acc.is_empty() {
                T::nan()
            } else {
                T::demote(acc.mean())
            },
            variance,
            stddev,
        }
    }
}

/// Mean, variance and standard deviation of one reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatSummary<T> {
    /// Number of samples.
    pub count: u64,
    /// Arithmetic mean (`NaN` for no samples).
    pub mean: T,
    /// Variance (`NaN` when undefined).
    pub variance: T,
    /// Standard deviation (`NaN` when undefined).
    pub stddev: T,
}
