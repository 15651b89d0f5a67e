//! Streaming Statistics Examples
//!
//! This example folds a sample stream with `WelfordOps`, merges partial
//! states from independent workers, and shows the undefined-result cases.
//!
//! Run with: `cargo run --example streaming_statistics`

use fast_welford::prelude::*;

fn main() {
    println!("=== Streaming Statistics ===");
    println!();

    let data = [2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    // Example 1: one accumulator, one sample at a time
    println!("1. Sequential fold:");
    let ops: WelfordOps<f64> = WelfordOps::new(false, true);
    let mut state = WelfordState::new();
    for &x in &data {
        state = ops.reduce(state, x);
        println!(
            "   x = {x:>4}  count = {}  mean = {:.4}  m2 = {:.4}",
            state.count(),
            state.mean(),
            state.m2()
        );
    }
    println!("   population stddev = {}", ops.project(state));
    println!();

    // Example 2: two workers, merged afterwards
    println!("2. Merging partial states:");
    let (left, right) = data.split_at(3);
    let a = fold_sequential(&ops, left);
    let b = fold_sequential(&ops, right);
    let merged = ops.combine(a, b);
    println!("   left  = {a:?}");
    println!("   right = {b:?}");
    println!("   merged stddev = {}", ops.project(merged));
    println!();

    // Example 3: builder presets
    println!("3. Presets:");
    println!("   variance        = {}", Welford::variance().compute(&data));
    println!("   sample_variance = {}", Welford::sample_variance().compute(&data));
    println!("   stddev          = {}", Welford::stddev().compute(&data));
    println!("   sample_stddev   = {}", Welford::sample_stddev().compute(&data));
    println!();

    // Example 4: undefined results are NaN, not errors
    println!("4. Undefined results:");
    let sample: WelfordOps<f64> = WelfordOps::new(true, false);
    let one = sample.reduce(WelfordState::new(), 42.0);
    println!("   sample variance of one sample = {}", sample.project(one));
    println!("   variance of nothing           = {}", variance::<f64>(&[], false));
    match mean::<f64>(&[]) {
        Ok(m) => println!("   Unexpected mean {m}"),
        Err(Error::EmptyInput) => println!("   mean of nothing: EmptyInput (expected)"),
        Err(e) => println!("   Unexpected error: {e}"),
    }
}
