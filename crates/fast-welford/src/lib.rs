//! fast-welford: numerically stable, parallel-composable streaming statistics
//!
//! This crate computes mean, variance and standard deviation of a sample
//! stream in a single pass with Welford's algorithm, and merges partial
//! results with Chan's parallel formula so a reduction can be split across
//! threads, SIMD lanes or a lockstep lane group in any tree shape.
//!
//! # Features
//!
//! - **Stability**: no raw sum-of-squares, so no catastrophic cancellation
//! - **Composability**: `combine` is associative and commutative up to rounding
//! - **Generics**: samples in `f32` or `f64`, accumulation always in `f64`
//! - **Lanes**: `cross_lane_combine` for shuffle-down reductions, with a
//!   host emulation of a lockstep group
//!
//! # Quick Start
//!
//! ```
//! use fast_welford::prelude::*;
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let ops: WelfordOps<f64> = WelfordOps::new(true, true);
//!
//! let left = fold_sequential(&ops, &data[..2]);
//! let right = fold_sequential(&ops, &data[2..]);
//! let std = ops.project(ops.combine(left, right));
//!
//! assert!((std - 1.5811388300841898).abs() < 1e-12);
//! ```
//!
//! # Undefined Results
//!
//! The core operations never fail. A statistic that is undefined for the
//! number of samples (no samples, or one sample with Bessel's correction)
//! comes back as `NaN`:
//!
//! ```
//! use fast_welford::Welford;
//!
//! assert!(Welford::sample_variance().compute(&[4.0_f64]).is_nan());
//! assert_eq!(Welford::variance().compute(&[4.0_f64]), 0.0);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod lanes;
pub mod prelude;
pub mod reduction;
pub mod runtime;
pub mod traits;
pub mod utils;
pub mod welford;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use lanes::{HostLanes, LanePrimitives, LockstepGroup};
pub use reduction::ReductionStrategy;
pub use traits::SampleElement;
pub use utils::{approx_eq, approx_eq_relative, EPSILON, LOOSE_EPSILON};
pub use welford::{StatSummary, Welford, WelfordOps, WelfordState};
