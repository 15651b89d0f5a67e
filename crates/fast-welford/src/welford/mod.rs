//! Welford mean/variance accumulation with parallel merge.
//!
//! This module is the statistical core of the crate:
//!
//! - [`WelfordState`]: the `(mean, m2, count)` triple of everything folded so far
//! - [`WelfordOps`]: the stateless policy exposing `reduce`, `combine`,
//!   `project` and `cross_lane_combine`
//! - [`Welford`]: the two-flag options builder
//!
//! # Algorithm
//!
//! ```text
//! reduce(acc, x):
//!   delta    = x - mean
//!   mean'    = mean + delta / (count + 1)
//!   m2'      = m2 + delta * (x - mean')
//!   count'   = count + 1
//!
//! combine(a, b):                      # a or b empty -> the other one
//!   delta    = b.mean - a.mean
//!   n        = a.count + b.count
//!   mean'    = a.mean + delta * (b.count / n)
//!   m2'      = a.m2 + b.m2 + delta^2 * a.count * (b.count / n)
//!
//! project(acc):
//!   d        = unbiased ? count - 1 : count
//!   result   = d > 0 ? (take_sqrt ? sqrt(m2 / d) : m2 / d) : NaN
//! ```
//!
//! `combine` can be applied in any bracketing and order; the result matches a
//! sequential fold of the concatenated samples up to floating-point rounding.
//!
//! # References
//!
//! - Welford, B. P. (1962). "Note on a method for calculating corrected sums
//!   of squares and products". Technometrics. 4 (3): 419-420.
//! - Chan, T. F., Golub, G. H., LeVeque, R. J. (1979). "Updating formulae and
//!   a pairwise algorithm for computing sample variances". Stanford CS Tech
//!   Report STAN-CS-79-773.

pub mod config;
pub mod ops;
pub mod state;

pub use config::Welford;
pub use ops::{StatSummary, WelfordOps};
pub use state::WelfordState;
