//! Opt-in timing hooks for surface rebuilds.
//!
//! Timing is only collected when the `rebuild_metrics` feature is enabled and the target
//! is not WASM (`std::time::Instant` is unavailable there). Otherwise every call compiles
//! down to running the closure.
//!
//! ```ignore
//! use bezier_engine::geom::{RebuildMetrics, TimingBucket};
//!
//! let mut metrics = RebuildMetrics::default();
//! metrics.begin();
//! let samples = metrics.time(TimingBucket::Sampling, || sample_patches(&patches, 10));
//! if let Some(report) = metrics.end() {
//!     println!("sampling: {} ns", report.sampling_ns);
//! }
//! ```

use serde::Serialize;

/// Phases of a surface rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Control-point patch layout.
    ControlGrid,
    /// Parametric sampling of every patch.
    Sampling,
    /// Face generation and normal accumulation.
    Tessellation,
}

/// Nanoseconds spent per rebuild phase. Repeated calls to a bucket accumulate.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildTimingReport {
    pub control_grid_ns: u64,
    pub sampling_ns: u64,
    pub tessellation_ns: u64,
}

impl RebuildTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.control_grid_ns
            .saturating_add(self.sampling_ns)
            .saturating_add(self.tessellation_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for rebuild timings; see the module docs for gating.
#[derive(Debug, Default)]
pub struct RebuildMetrics {
    #[cfg(all(feature = "rebuild_metrics", not(target_arch = "wasm32")))]
    report: RebuildTimingReport,
}

impl RebuildMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "rebuild_metrics", not(target_arch = "wasm32")))]
        {
            self.report = RebuildTimingReport::default();
        }
    }

    /// Returns the accumulated report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<RebuildTimingReport> {
        #[cfg(all(feature = "rebuild_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "rebuild_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "rebuild_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            let slot = match bucket {
                TimingBucket::ControlGrid => &mut self.report.control_grid_ns,
                TimingBucket::Sampling => &mut self.report.sampling_ns,
                TimingBucket::Tessellation => &mut self.report.tessellation_ns,
            };
            *slot = slot.saturating_add(nanos);
            result
        }

        #[cfg(not(all(feature = "rebuild_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }
}
