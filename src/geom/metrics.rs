//! Opt-in stage timing for the refiner.
//!
//! Timing is only collected when the `refine_metrics` feature is enabled and the target
//! is not `wasm32` (no `std::time::Instant` there). Otherwise every call compiles down to
//! running the closure.
//!
//! ```ignore
//! let mut metrics = RefineMetrics::default();
//! metrics.begin();
//! let normals = metrics.time(TimingBucket::Normals, || corner_normals(..));
//! if let Some(report) = metrics.end() {
//!     log::debug!("normals took {} ns", report.normals_ns);
//! }
//! ```

/// Refiner stages that accumulate time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Input validation, working copy and connectivity.
    Prepare,
    /// Normal synthesis.
    Normals,
    /// Tangent synthesis.
    Tangents,
    /// Corner dedup, splitting and triangulation.
    Refine,
    /// Material grouping.
    Submesh,
}

/// Nanoseconds per stage; repeated calls to one bucket add up.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefineTimingReport {
    pub prepare_ns: u64,
    pub normals_ns: u64,
    pub tangents_ns: u64,
    pub refine_ns: u64,
    pub submesh_ns: u64,
}

impl RefineTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.prepare_ns
            .saturating_add(self.normals_ns)
            .saturating_add(self.tangents_ns)
            .saturating_add(self.refine_ns)
            .saturating_add(self.submesh_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator: [`begin`](Self::begin) resets, [`time`](Self::time) measures a closure,
/// [`end`](Self::end) returns the report or `None` when timing is compiled out.
#[derive(Debug, Default, Clone)]
pub struct RefineMetrics {
    #[cfg(all(feature = "refine_metrics", not(target_arch = "wasm32")))]
    report: RefineTimingReport,
}

impl RefineMetrics {
    pub fn begin(&mut self) {
        #[cfg(all(feature = "refine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = RefineTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<RefineTimingReport> {
        #[cfg(all(feature = "refine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "refine_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "refine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "refine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "refine_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Prepare => &mut self.report.prepare_ns,
            TimingBucket::Normals => &mut self.report.normals_ns,
            TimingBucket::Tangents => &mut self.report.tangents_ns,
            TimingBucket::Refine => &mut self.report.refine_ns,
            TimingBucket::Submesh => &mut self.report.submesh_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
