//! Lane-exchange primitives and lockstep lane-group reduction.
//!
//! A hardware execution group (a GPU warp, a SIMD register file) reduces
//! partial states by having every lane read a register from the lane `offset`
//! positions above it, for `offset = width / 2, ..., 1`. Two pieces live here:
//!
//! - [`LanePrimitives`]: the capability interface the core needs from the
//!   platform, `sqrt` and `shuffle_down`. [`HostLanes`] is the default.
//! - [`LockstepGroup`]: a host emulation of such a group. Each lane runs on its
//!   own scoped thread and `shuffle_down` goes through a shared register file
//!   guarded by a barrier, so every lane executes each exchange in lockstep.
//!
//! # Example
//!
//! ```
//! use fast_welford::lanes::LockstepGroup;
//! use fast_welford::welford::{WelfordOps, WelfordState};
//!
//! let ops: WelfordOps<f64> = WelfordOps::new(false, false);
//! let states: Vec<WelfordState> = (0..4)
//!     .map(|lane| ops.reduce(WelfordState::new(), f64::from(lane + 1)))
//!     .collect();
//!
//! let lanes = LockstepGroup::new(4).unwrap().reduce(&ops, &states).unwrap();
//! assert_eq!(lanes[0].count(), 4);
//! assert!((lanes[0].mean() - 2.5).abs() < 1e-12);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Barrier;
use std::thread;

use crate::error::{Error, Result};
use crate::traits::SampleElement;
use crate::welford::{WelfordOps, WelfordState};

/// Largest lane group the lockstep emulation accepts.
pub const MAX_LANE_WIDTH: usize = 64;

/// Platform primitives used by [`WelfordOps`].
///
/// Selected at compile time through the `P` parameter of `WelfordOps<T, P>`.
pub trait LanePrimitives {
    /// Square root used by `project`.
    #[inline]
    #[must_use]
    fn sqrt(x: f64) -> f64 {
        x.sqrt()
    }

    /// Returns `value` as held by the lane `offset` positions above the caller.
    ///
    /// Lanes with no such neighbour receive their own `value` back.
    fn shuffle_down_f64(&self, value: f64, offset: u32) -> f64;

    /// Integer variant of [`shuffle_down_f64`](Self::shuffle_down_f64).
    fn shuffle_down_u64(&self, value: u64, offset: u32) -> u64;
}

/// Default primitives for plain host code.
///
/// Behaves as a group of one lane: every offset is out of range, so the
/// shuffle hands back the caller's own value. A
/// [`cross_lane_combine`](crate::WelfordOps::cross_lane_combine) through
/// these primitives merges a state with itself; merge host partials with
/// [`combine`](crate::WelfordOps::combine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostLanes;

impl LanePrimitives for HostLanes {
    #[inline]
    fn shuffle_down_f64(&self, value: f64, _offset: u32) -> f64 {
        value
    }

    #[inline]
    fn shuffle_down_u64(&self, value: u64, _offset: u32) -> u64 {
        value
    }
}

/// Shared registers of one lockstep group.
#[derive(Debug)]
struct RegisterFile {
    registers: Vec<AtomicU64>,
    barrier: Barrier,
}

impl RegisterFile {
    fn new(width: usize) -> Self {
        Self {
            registers: (0..width).map(|_| AtomicU64::new(0)).collect(),
            barrier: Barrier::new(width),
        }
    }
}

/// One lane's view of a running [`LockstepGroup`].
///
/// Every lane of the group must call the shuffle methods the same number of
/// times with the same offsets, or the group deadlocks on its barrier.
#[derive(Debug)]
pub struct LaneHandle<'a> {
    lane: usize,
    width: usize,
    file: &'a RegisterFile,
}

impl LaneHandle<'_> {
    /// Index of this lane within its group.
    #[must_use]
    pub const fn lane(&self) -> usize {
        self.lane
    }

    fn exchange(&self, bits: u64, offset: u32) -> u64 {
        self.file.registers[self.lane].store(bits, Ordering::Release);
        self.file.barrier.wait();
        let fetched = match self.lane.checked_add(offset as usize) {
            Some(src) if src < self.width => self.file.registers[src].load(Ordering::Acquire),
            _ => bits,
        };
        // nobody may overwrite a register until every lane has read it
        self.file.barrier.wait();
        fetched
    }
}

impl LanePrimitives for LaneHandle<'_> {
    fn shuffle_down_f64(&self, value: f64, offset: u32) -> f64 {
        f64::from_bits(self.exchange(value.to_bits(), offset))
    }

    fn shuffle_down_u64(&self, value: u64, offset: u32) -> u64 {
        self.exchange(value, offset)
    }
}

/// A host-emulated group of lanes executing lane shuffles in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockstepGroup {
    width: usize,
}

impl LockstepGroup {
    /// Creates a group of `width` lanes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLaneGroup` unless `width` is a power of two in
    /// `1..=MAX_LANE_WIDTH`.
    pub const fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::InvalidLaneGroup {
                width,
                reason: "width must be at least 1",
            });
        }
        if !width.is_power_of_two() {
            return Err(Error::InvalidLaneGroup {
                width,
                reason: "width must be a power of two",
            });
        }
        if width > MAX_LANE_WIDTH {
            return Err(Error::InvalidLaneGroup {
                width,
                reason: "width exceeds the largest supported lane group",
            });
        }
        Ok(Self { width })
    }

    /// Number of lanes.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Shuffle offsets of the butterfly, largest first: `width / 2, ..., 1`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn offsets(&self) -> impl Iterator<Item = u32> {
        // width <= MAX_LANE_WIDTH, so the cast is lossless
        let half = (self.width / 2) as u32;
        std::iter::successors(Some(half), |&o| Some(o / 2)).take_while(|&o| o > 0)
    }

    /// Reduces one partial state per lane with lockstep `cross_lane_combine`.
    ///
    /// Returns the final state of every lane; lane 0 holds the reduction of
    /// the whole group. The other lanes hold partial or duplicated results,
    /// exactly as a hardware warp would leave them.
    ///
    /// # Errors
    ///
    /// Returns `Error::LaneCountMismatch` if `states.len() != self.width()`.
    pub fn reduce<T, P>(
        &self,
        ops: &WelfordOps<T, P>,
        states: &[WelfordState],
    ) -> Result<Vec<WelfordState>>
    where
        T: SampleElement,
    {
        if states.len() != self.width {
            return Err(Error::LaneCountMismatch {
                expected: self.width,
                actual: states.len(),
            });
        }
        if self.width == 1 {
            return Ok(states.to_vec());
        }

        log::debug!("lockstep reduction over {} lanes", self.width);
        let width = self.width;
        let file = RegisterFile::new(width);
        let lane_ops: WelfordOps<T, LaneHandle<'_>> = ops.with_lanes();

        let finals = thread::scope(|scope| {
            let workers: Vec<_> = states
                .iter()
                .enumerate()
                .map(|(lane, &state)| {
                    let file = &file;
                    let offsets = self.offsets();
                    scope.spawn(move || {
                        let handle = LaneHandle { lane, width, file };
                        offsets.fold(state, |acc, offset| {
                            if lane == 0 {
                                log::trace!("lane round: offset {offset}");
                            }
                            lane_ops.cross_lane_combine(acc, offset, &handle)
                        })
                    })
                })
                .collect();

            workers
                .into_iter()
                .map(|worker| {
                    worker
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect::<Vec<_>>()
        });

        Ok(finals)
    }
}

/// Folds `data` through a lockstep group of `width` lanes.
///
/// Lane `i` privately reduces samples `i, i + width, i + 2 * width, ...`
/// (the strided layout a warp sees when it sweeps a buffer), then the group
/// runs the shuffle butterfly. The returned state is lane 0's.
///
/// # Errors
///
/// Returns `Error::InvalidLaneGroup` if `width` is not a usable group width.
///
/// # Example
///
/// ```
/// use fast_welford::lanes::lockstep_fold;
/// use fast_welford::welford::WelfordOps;
///
/// let ops: WelfordOps<f64> = WelfordOps::new(true, false);
/// let data: Vec<f64> = (1..=5).map(f64::from).collect();
/// let state = lockstep_fold(&ops, &data, 4).unwrap();
/// assert!((ops.project(state) - 2.5).abs() < 1e-12);
/// ```
pub fn lockstep_fold<T, P>(ops: &WelfordOps<T, P>, data: &[T], width: usize) -> Result<WelfordState>
where
    T: SampleElement,
    P: LanePrimitives,
{
    let group = LockstepGroup::new(width)?;
    let states: Vec<WelfordState> = (0..width)
        .map(|lane| {
            data.iter()
                .skip(lane)
                .step_by(width)
                .fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x))
        })
        .collect();
    let lanes = group.reduce(ops, &states)?;
    Ok(lanes.first().copied().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(ops: &WelfordOps<f64>, x: f64) -> WelfordState {
        ops.reduce(WelfordState::new(), x)
    }

    #[test]
    fn test_group_width_validation() {
        assert!(LockstepGroup::new(1).is_ok());
        assert!(LockstepGroup::new(32).is_ok());
        assert!(LockstepGroup::new(MAX_LANE_WIDTH).is_ok());
        assert!(matches!(
            LockstepGroup::new(0),
            Err(Error::InvalidLaneGroup { width: 0, .. })
        ));
        assert!(matches!(
            LockstepGroup::new(12),
            Err(Error::InvalidLaneGroup { width: 12, .. })
        ));
        assert!(matches!(
            LockstepGroup::new(128),
            Err(Error::InvalidLaneGroup { width: 128, .. })
        ));
    }

    #[test]
    fn test_offsets_descend_by_halves() {
        let offsets: Vec<u32> = LockstepGroup::new(32).unwrap().offsets().collect();
        assert_eq!(offsets, vec![16, 8, 4, 2, 1]);

        let none: Vec<u32> = LockstepGroup::new(1).unwrap().offsets().collect();
        assert!(none.is_empty());
    }

    #[test]
    fn test_reduce_lane_zero_holds_total() {
        let ops: WelfordOps<f64> = WelfordOps::default();
        let states: Vec<WelfordState> = (0..8).map(|i| single(&ops, f64::from(i))).collect();
        let lanes = LockstepGroup::new(8).unwrap().reduce(&ops, &states).unwrap();

        assert_eq!(lanes.len(), 8);
        assert_eq!(lanes[0].count(), 8);
        assert!((lanes[0].mean() - 3.5).abs() < 1e-12);
        // sum of (i - 3.5)^2 for i in 0..8
        assert!((lanes[0].m2() - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_reduce_with_empty_lanes() {
        let ops: WelfordOps<f64> = WelfordOps::default();
        let mut states = vec![WelfordState::new(); 4];
        states[2] = single(&ops, 10.0);
        let lanes = LockstepGroup::new(4).unwrap().reduce(&ops, &states).unwrap();
        assert_eq!(lanes[0], states[2]);
    }

    #[test]
    fn test_reduce_lane_count_mismatch() {
        let ops: WelfordOps<f64> = WelfordOps::default();
        let states = vec![WelfordState::new(); 3];
        assert_eq!(
            LockstepGroup::new(4).unwrap().reduce(&ops, &states),
            Err(Error::LaneCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_reduce_single_lane_is_identity() {
        let ops: WelfordOps<f64> = WelfordOps::default();
        let states = vec![single(&ops, 4.0)];
        let lanes = LockstepGroup::new(1).unwrap().reduce(&ops, &states).unwrap();
        assert_eq!(lanes, states);
    }

    #[test]
    fn test_lockstep_fold_matches_sequential() {
        let ops: WelfordOps<f32> = WelfordOps::new(true, true);
        let data: Vec<f32> = (0..37_u8).map(|i| f32::from(i) * 0.25).collect();
        let sequential = data
            .iter()
            .fold(WelfordState::new(), |acc, &x| ops.reduce(acc, x));
        let lanes = lockstep_fold(&ops, &data, 16).unwrap();

        assert_eq!(lanes.count(), sequential.count());
        assert!((lanes.mean() - sequential.mean()).abs() < 1e-10);
        assert!((lanes.m2() - sequential.m2()).abs() < 1e-9);
    }

    #[test]
    fn test_lockstep_fold_fewer_samples_than_lanes() {
        let ops: WelfordOps<f64> = WelfordOps::default();
        let state = lockstep_fold(&ops, &[1.0, 3.0], 8).unwrap();
        assert_eq!(state.count(), 2);
        assert!((state.mean() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_lockstep_fold_empty() {
        let ops: WelfordOps<f64> = WelfordOps::default();
        let empty: [f64; 0] = [];
        let state = lockstep_fold(&ops, &empty, 4).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_host_lanes_return_own_value() {
        assert_eq!(HostLanes.shuffle_down_f64(1.25, 4), 1.25);
        assert_eq!(HostLanes.shuffle_down_u64(9, 1), 9);
        assert_eq!(<HostLanes as LanePrimitives>::sqrt(16.0), 4.0);
    }
}
