//! Shared test utilities for fast-welford tests.

use fast_welford::welford::{WelfordOps, WelfordState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Relative tolerance for comparing states built by different reduction trees.
#[allow(dead_code)]
pub const TREE_TOLERANCE: f64 = 1e-9;

/// Fixed seed for reproducible sample generation.
#[allow(dead_code)]
pub const SEED: u64 = 0x57E1_F0D0_2025;

/// Relative closeness, treating two NaNs as equal.
#[allow(dead_code)]
pub fn rel_close(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tol * scale
}

/// Folds `data` sequentially with `ops`.
#[allow(dead_code)]
pub fn fold(ops: &WelfordOps<f64>, data: &[f64]) -> WelfordState {
    data.iter()
        .fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x))
}

/// Asserts two states describe the same samples up to `tol`.
#[allow(dead_code)]
pub fn assert_states_close(actual: WelfordState, expected: WelfordState, tol: f64) {
    assert_eq!(actual.count(), expected.count(), "count mismatch");
    assert!(
        rel_close(actual.mean(), expected.mean(), tol),
        "mean {} vs {}",
        actual.mean(),
        expected.mean()
    );
    assert!(
        rel_close(actual.m2(), expected.m2(), tol),
        "m2 {} vs {}",
        actual.m2(),
        expected.m2()
    );
}

/// Generates `n` samples uniformly spread over `offset ± scale`.
#[allow(dead_code)]
pub fn generate_samples(seed: u64, n: usize, offset: f64, scale: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| offset + scale * (2.0 * rng.random::<f64>() - 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_close() {
        assert!(rel_close(1.0, 1.0 + 1e-12, 1e-10));
        assert!(rel_close(f64::NAN, f64::NAN, 1e-10));
        assert!(!rel_close(f64::NAN, 1.0, 1e-10));
        assert!(!rel_close(1.0, 2.0, 1e-10));
    }

    #[test]
    fn test_generate_samples_is_deterministic() {
        assert_eq!(generate_samples(1, 10, 0.0, 1.0), generate_samples(1, 10, 0.0, 1.0));
        assert!(generate_samples(1, 100, 5.0, 1.0)
            .iter()
            .all(|&x| (4.0..=6.0).contains(&x)));
    }
}
