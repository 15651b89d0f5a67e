//! Reduction Strategy Examples
//!
//! The same samples reduced sequentially, as a pairwise tree, in contiguous
//! partitions, on the Rayon pool and through a lockstep lane group. Every
//! strategy answers the same question; only the last bits differ.
//!
//! Run with: `cargo run --example reduction_strategies`

use fast_welford::prelude::*;
use fast_welford::utils::two_pass_variance;

fn main() {
    let data: Vec<f64> = (0..100_000)
        .map(|i| 1e6 + (f64::from(i) * 0.37).sin() * 3.0)
        .collect();
    let ops: WelfordOps<f64> = WelfordOps::new(true, false);

    println!("=== Reduction Strategies ({} samples) ===", data.len());
    println!("   two-pass reference: {:.15}", two_pass_variance(&data, true));

    for strategy in [
        ReductionStrategy::Sequential,
        ReductionStrategy::Tree { leaf_size: 64 },
        ReductionStrategy::Partitioned { partitions: 8 },
        ReductionStrategy::Parallel { min_chunk: 8_192 },
        ReductionStrategy::Lockstep { width: 32 },
    ] {
        match fold_with(&ops, &data, strategy) {
            Ok(state) => println!("   {:<12} {:.15}", strategy.name(), ops.project(state)),
            Err(e) => println!("   {:<12} error: {e}", strategy.name()),
        }
    }

    println!();
    println!("Invalid lane width:");
    if let Err(e) = fold_with(&ops, &data, ReductionStrategy::Lockstep { width: 24 }) {
        println!("   {e}");
    }
}
