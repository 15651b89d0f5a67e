//! Commonly used types and traits for convenient importing.
//!
//! # Usage
//!
//! ```
//! use fast_welford::prelude::*;
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//!
//! let ops: WelfordOps<f64> = Welford::sample_variance().ops();
//! let state = fold_tree(&ops, &data, 2).unwrap();
//! assert!((ops.project(state) - 2.5).abs() < 1e-12);
//! ```

// Error types
pub use crate::error::{Error, Result};

// Traits
pub use crate::lanes::LanePrimitives;
pub use crate::traits::{SampleElement, ValidatedInput};

// Core types
pub use crate::welford::{StatSummary, Welford, WelfordOps, WelfordState};

// Drivers
pub use crate::lanes::{lockstep_fold, LockstepGroup};
pub use crate::reduction::{
    combine_all, fold_parallel, fold_partitioned, fold_sequential, fold_tree, fold_with, mean,
    stddev, summarize, variance, ReductionStrategy,
};
