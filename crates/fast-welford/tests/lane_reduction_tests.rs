//! Lockstep lane-group reduction tests.

#![allow(clippy::float_cmp)]

mod common;

use common::{assert_states_close, fold, generate_samples, SEED, TREE_TOLERANCE};
use fast_welford::lanes::{lockstep_fold, HostLanes, LanePrimitives, LockstepGroup, MAX_LANE_WIDTH};
use fast_welford::prelude::*;

/// Square root that always answers 4, to observe which primitive `project` uses.
#[derive(Debug, Default)]
struct FixedSqrt;

impl LanePrimitives for FixedSqrt {
    fn sqrt(_x: f64) -> f64 {
        4.0
    }

    fn shuffle_down_f64(&self, value: f64, _offset: u32) -> f64 {
        value
    }

    fn shuffle_down_u64(&self, value: u64, _offset: u32) -> u64 {
        value
    }
}

#[test]
fn test_every_supported_width_matches_sequential() {
    let data = generate_samples(SEED, 1_000, 25.0, 5.0);
    let ops: WelfordOps<f64> = WelfordOps::new(true, false);
    let expected = fold(&ops, &data);

    let mut width = 1;
    while width <= MAX_LANE_WIDTH {
        let state = lockstep_fold(&ops, &data, width).unwrap();
        assert_states_close(state, expected, TREE_TOLERANCE);
        width *= 2;
    }
}

#[test]
fn test_more_lanes_than_samples() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0];
    let ops: WelfordOps<f64> = WelfordOps::new(true, false);

    let state = lockstep_fold(&ops, &data, 32).unwrap();
    assert_eq!(state.count(), 5);
    assert!((ops.project(state) - 2.5).abs() < 1e-12);
}

#[test]
fn test_empty_input_leaves_empty_state() {
    let ops: WelfordOps<f64> = WelfordOps::default();
    let empty: [f64; 0] = [];
    let state = lockstep_fold(&ops, &empty, 8).unwrap();
    assert!(state.is_empty());
    assert!(ops.project(state).is_nan());
}

#[test]
fn test_lane_zero_holds_group_total() {
    let ops: WelfordOps<f64> = WelfordOps::default();
    let states: Vec<WelfordState> = (0..16)
        .map(|lane| fold(&ops, &[f64::from(lane), f64::from(lane) + 0.5]))
        .collect();

    let lanes = LockstepGroup::new(16).unwrap().reduce(&ops, &states).unwrap();
    assert_eq!(lanes.len(), 16);
    assert_eq!(lanes[0].count(), 32);
    assert_states_close(lanes[0], combine_all(&ops, &states), TREE_TOLERANCE);
}

#[test]
fn test_upper_lanes_hold_partial_totals() {
    let ops: WelfordOps<f64> = WelfordOps::default();
    let states: Vec<WelfordState> = (0..8)
        .map(|lane| ops.reduce(WelfordState::new(), f64::from(lane)))
        .collect();

    let lanes = LockstepGroup::new(8).unwrap().reduce(&ops, &states).unwrap();
    // out-of-range reads return the lane's own state, so upper lanes fold in
    // duplicates of themselves; every lane ends with 8 samples
    assert!(lanes.iter().all(|s| s.count() == 8));
    assert_eq!(lanes[0].mean(), 3.5);
    // lane 4 sees {4, 4} then {6, 6} then lane 5's {5, 5, 7, 7}
    assert_eq!(lanes[4].mean(), 5.5);
    assert_eq!(lanes[7].mean(), 7.0);
    assert_eq!(lanes[7].m2(), 0.0);
}

#[test]
fn test_sparse_lanes_with_empty_states() {
    let ops: WelfordOps<f64> = WelfordOps::new(true, false);
    let mut states = vec![WelfordState::new(); 8];
    states[3] = fold(&ops, &[1.0, 2.0]);
    states[6] = fold(&ops, &[3.0, 4.0, 5.0]);

    let lanes = LockstepGroup::new(8).unwrap().reduce(&ops, &states).unwrap();
    assert_eq!(lanes[0].count(), 5);
    assert!((ops.project(lanes[0]) - 2.5).abs() < 1e-12);
}

#[test]
fn test_lane_count_mismatch() {
    let ops: WelfordOps<f64> = WelfordOps::default();
    let group = LockstepGroup::new(4).unwrap();
    let err = group.reduce(&ops, &[WelfordState::new(); 3]).unwrap_err();
    assert_eq!(
        err,
        Error::LaneCountMismatch {
            expected: 4,
            actual: 3
        }
    );
}

#[test]
fn test_invalid_widths() {
    let ops: WelfordOps<f64> = WelfordOps::default();
    for width in [0, 3, 12, MAX_LANE_WIDTH * 2] {
        assert!(matches!(
            lockstep_fold(&ops, &[1.0], width),
            Err(Error::InvalidLaneGroup { .. })
        ));
    }
}

#[test]
fn test_host_lanes_shuffle_returns_own_value() {
    let lanes = HostLanes;
    assert_eq!(lanes.shuffle_down_f64(1.5, 4), 1.5);
    assert_eq!(lanes.shuffle_down_u64(9, 1), 9);

    // on a single-lane group cross_lane_combine merges the state with itself
    let ops: WelfordOps<f64> = WelfordOps::default();
    let state = fold(&ops, &[1.0, 3.0]);
    let doubled = ops.cross_lane_combine(state, 1, &lanes);
    assert_eq!(doubled.count(), 4);
    assert_eq!(doubled.mean(), 2.0);
    assert_eq!(doubled.m2(), 4.0);
}

#[test]
fn test_project_uses_platform_sqrt() {
    let ops: WelfordOps<f64, FixedSqrt> = WelfordOps::new(false, true);
    let state = ops.reduce(ops.reduce(WelfordState::new(), 1.0), 3.0);
    assert_eq!(ops.project(state), 4.0);

    let variance_only: WelfordOps<f64, FixedSqrt> = WelfordOps::new(false, false);
    assert_eq!(variance_only.project(state), 1.0);
}

#[test]
fn test_lockstep_strategy_via_builder() {
    let data = generate_samples(SEED + 10, 777, -3.0, 2.0);
    let sequential = Welford::sample_stddev().compute(&data);
    let lockstep = Welford::sample_stddev()
        .compute_with(&data, ReductionStrategy::Lockstep { width: 16 })
        .unwrap();
    assert!((sequential - lockstep).abs() < 1e-9);
}
