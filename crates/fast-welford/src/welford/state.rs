//! The Welford accumulator state.

/// Running statistics of every sample folded in so far.
///
/// The state is a plain `Copy` value: operations never mutate a state in
/// place, they return a new one. All three fields are kept in double
/// precision (or as an integer count) regardless of the sample element type.
///
/// The default value is the identity element of
/// [`WelfordOps::combine`](super::WelfordOps::combine): zero samples, zero
/// mean, zero `m2`.
///
/// # Example
///
/// ```
/// use fast_welford::welford::{WelfordOps, WelfordState};
///
/// let ops: WelfordOps<f64> = WelfordOps::new(false, false);
/// let state = [2.0, 4.0, 6.0]
///     .iter()
///     .fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x));
///
/// assert_eq!(state.count(), 3);
/// assert!((state.mean() - 4.0).abs() < 1e-12);
/// assert!((state.m2() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WelfordState {
    mean: f64,
    m2: f64, // sum of squared deviations from the running mean
    count: u64,
}

impl WelfordState {
    /// Creates the empty (identity) state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mean: 0.0,
            m2: 0.0,
            count: 0,
        }
    }

    /// Builds a state from its raw fields.
    ///
    /// Used when a partial state arrives from somewhere other than
    /// `reduce`/`combine`, e.g. a lane exchange or a stored checkpoint.
    /// The caller is responsible for the fields being consistent.
    #[must_use]
    pub const fn from_parts(mean: f64, m2: f64, count: u64) -> Self {
        Self { mean, m2, count }
    }

    /// Running arithmetic mean. `0.0` for the empty state.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Running sum of squared deviations from the mean.
    #[must_use]
    pub const fn m2(&self) -> f64 {
        self.m2
    }

    /// Number of samples folded so far.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Returns `true` for the identity state.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_identity() {
        let state = WelfordState::new();
        assert_eq!(state.count(), 0);
        assert_eq!(state.mean(), 0.0);
        assert_eq!(state.m2(), 0.0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_default_matches_new() {
        assert_eq!(WelfordState::default(), WelfordState::new());
    }

    #[test]
    fn test_from_parts() {
        let state = WelfordState::from_parts(1.5, 0.5, 2);
        assert_eq!(state.mean(), 1.5);
        assert_eq!(state.m2(), 0.5);
        assert_eq!(state.count(), 2);
        assert!(!state.is_empty());
    }

    #[test]
    fn test_state_is_copy() {
        let a = WelfordState::from_parts(3.0, 1.0, 4);
        let b = a;
        assert_eq!(a, b);
    }
}
