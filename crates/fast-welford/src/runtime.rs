//! Process-wide runtime flags, build options and call counters.
//!
//! Everything here is operational bookkeeping. The statistical core in
//! [`crate::welford`] never reads it; front ends (the CLI, a host engine)
//! set the flags once at start-up and consult them afterwards.
//!
//! # Example
//!
//! ```
//! use fast_welford::runtime::{build_options, CounterThenLog};
//!
//! static REDUCTIONS: CounterThenLog = CounterThenLog::new("reductions");
//!
//! REDUCTIONS.bump(1);
//! assert!(REDUCTIONS.count() >= 1);
//! assert!(build_options().contains_key("version"));
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;

/// Accelerator runtimes a host process may have linked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// NVIDIA CUDA.
    Cuda,
    /// AMD HIP/ROCm.
    Hip,
}

impl Backend {
    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cuda => "CUDA",
            Self::Hip => "HIP",
        }
    }

    /// Every known backend.
    pub const ALL: [Self; 2] = [Self::Cuda, Self::Hip];

    fn flag(self) -> &'static AtomicBool {
        match self {
            Self::Cuda => &CUDA_LINKED,
            Self::Hip => &HIP_LINKED,
        }
    }
}

static CUDA_LINKED: AtomicBool = AtomicBool::new(false);
static HIP_LINKED: AtomicBool = AtomicBool::new(false);

/// Whether `backend` has been registered as linked into this process.
#[must_use]
pub fn has_runtime(backend: Backend) -> bool {
    backend.flag().load(Ordering::Acquire)
}

/// Registration hooks for backend crates. Call once during start-up.
pub mod internal {
    use super::{Backend, Ordering};

    /// Marks `backend` as linked. Idempotent.
    pub fn set_runtime_flag(backend: Backend) {
        if !backend.flag().swap(true, Ordering::AcqRel) {
            log::info!("{} runtime registered", backend.name());
        }
    }
}

/// Build strings of this library, initialised on first use.
pub fn build_options() -> &'static BTreeMap<&'static str, &'static str> {
    static OPTIONS: OnceLock<BTreeMap<&'static str, &'static str>> = OnceLock::new();
    OPTIONS.get_or_init(|| {
        let mut options = BTreeMap::new();
        options.insert("package", env!("CARGO_PKG_NAME"));
        options.insert("version", env!("CARGO_PKG_VERSION"));
        options.insert("target_arch", std::env::consts::ARCH);
        options.insert("target_os", std::env::consts::OS);
        options.insert(
            "profile",
            if cfg!(debug_assertions) {
                "debug"
            } else {
                "release"
            },
        );
        options.insert(
            "parallel",
            if cfg!(feature = "parallel") {
                "on"
            } else {
                "off"
            },
        );
        options
    })
}

/// Interval between log lines emitted by [`CounterThenLog`].
pub const LOG_EVERY: u64 = 1_000_000;

/// A named call counter that logs its running total every [`LOG_EVERY`] bumps.
#[derive(Debug)]
pub struct CounterThenLog {
    name: &'static str,
    count: AtomicU64,
}

impl CounterThenLog {
    /// Creates a counter at zero. `const` so it can back a `static`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            count: AtomicU64::new(0),
        }
    }

    /// Counter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Records one event and logs when the total crosses a multiple of
    /// [`LOG_EVERY`] (within the next `i` events).
    pub fn bump(&self, i: u64) {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if count % LOG_EVERY < i {
            log::info!("CounterThenLog: {} = {}", self.name, count);
        }
    }

    /// Events recorded so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
