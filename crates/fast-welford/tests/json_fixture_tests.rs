//! JSON-driven fixture tests.
//!
//! Loads the cases in tests/fixtures/ and checks the accumulator state and
//! projected statistic for each one. A `null` expectation means `NaN`.

#![allow(clippy::float_cmp)]

use fast_welford::reduction::fold_tree;
use fast_welford::utils::approx_eq;
use fast_welford::welford::{WelfordOps, WelfordState};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const EPSILON: f64 = 1e-10;
const FIXTURE_VERSION: &str = "1.0";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[derive(Debug, Deserialize)]
struct FixtureFile<C> {
    fixture_version: String,
    rationale: String,
    cases: Vec<C>,
}

#[derive(Debug, Deserialize)]
struct Expected {
    count: u64,
    mean: Option<f64>,
    m2: f64,
    result: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProjectionCase {
    name: String,
    input: Vec<f64>,
    unbiased: bool,
    take_sqrt: bool,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
struct CombineCase {
    name: String,
    left: Vec<f64>,
    right: Vec<f64>,
    unbiased: bool,
    expected: Expected,
}

fn load<C: serde::de::DeserializeOwned>(file: &str) -> Vec<C> {
    let path = fixtures_dir().join(file);
    let content = fs::read_to_string(&path).expect("Failed to read fixture file");
    let fixture: FixtureFile<C> =
        serde_json::from_str(&content).expect("Invalid fixture schema");
    assert_eq!(
        fixture.fixture_version, FIXTURE_VERSION,
        "{file}: unexpected fixture_version"
    );
    assert!(!fixture.rationale.is_empty(), "{file}: missing rationale");
    assert!(!fixture.cases.is_empty(), "{file}: no cases");
    fixture.cases
}

fn fold(ops: &WelfordOps<f64>, data: &[f64]) -> WelfordState {
    data.iter()
        .fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x))
}

fn check(label: &str, ops: &WelfordOps<f64>, state: WelfordState, expected: &Expected) {
    assert_eq!(state.count(), expected.count, "{label}: count");
    match expected.mean {
        Some(mean) => assert!(
            approx_eq(state.mean(), mean, EPSILON),
            "{label}: mean expected {mean}, got {}",
            state.mean()
        ),
        None => assert!(state.is_empty(), "{label}: expected empty state"),
    }
    assert!(
        approx_eq(state.m2(), expected.m2, EPSILON),
        "{label}: m2 expected {}, got {}",
        expected.m2,
        state.m2()
    );

    let result = ops.project(state);
    match expected.result {
        Some(value) => assert!(
            approx_eq(result, value, EPSILON),
            "{label}: result expected {value}, got {result}"
        ),
        None => assert!(result.is_nan(), "{label}: expected NaN, got {result}"),
    }
}

fn run_projection_file(file: &str) {
    for case in load::<ProjectionCase>(file) {
        let ops = WelfordOps::new(case.unbiased, case.take_sqrt);
        check(&case.name, &ops, fold(&ops, &case.input), &case.expected);

        let tree = fold_tree(&ops, &case.input, 2).expect("leaf size is valid");
        check(&format!("{} (tree)", case.name), &ops, tree, &case.expected);
    }
}

#[test]
fn test_projection_fixtures() {
    run_projection_file("projection.json");
}

#[test]
fn test_boundary_fixtures() {
    run_projection_file("boundaries.json");
}

#[test]
fn test_combine_fixtures() {
    for case in load::<CombineCase>("combine.json") {
        let ops = WelfordOps::new(case.unbiased, false);
        let merged = ops.combine(fold(&ops, &case.left), fold(&ops, &case.right));
        check(&case.name, &ops, merged, &case.expected);

        let swapped = ops.combine(fold(&ops, &case.right), fold(&ops, &case.left));
        check(&format!("{} (swapped)", case.name), &ops, swapped, &case.expected);
    }
}
