//! Opt-in timing hooks for surface meshing.
//!
//! Timing is only collected when the `mesh_metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise
//! every call is a plain pass-through and [`SurfaceMetrics::end`] returns `None`.
//!
//! ```ignore
//! let mut metrics = SurfaceMetrics::default();
//! metrics.begin();
//! let triangles = metrics.time(TimingBucket::Triangulation, || {
//!     triangulate_masked_grid(index, z.values())
//! });
//! if let Some(report) = metrics.end() {
//!     println!("triangulation: {} ns", report.triangulation_ns);
//! }
//! ```

/// Phases of [`surface_to_mesh3d`](super::surface_to_mesh3d).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Densifying the grid and nearest-neighbour sampling.
    Resample,
    /// Per-cell triangle emission.
    Triangulation,
    /// Flattening coordinates and index lists into the mesh record.
    Assembly,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfaceTimingReport {
    pub resample_ns: u64,
    pub triangulation_ns: u64,
    pub assembly_ns: u64,
}

impl SurfaceTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.resample_ns
            .saturating_add(self.triangulation_ns)
            .saturating_add(self.assembly_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing the meshing phases.
#[derive(Debug, Default)]
pub struct SurfaceMetrics {
    #[cfg(all(feature = "mesh_metrics", not(target_arch = "wasm32")))]
    report: SurfaceTimingReport,
}

impl SurfaceMetrics {
    /// Resets all counters.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "mesh_metrics", not(target_arch = "wasm32")))]
        {
            self.report = SurfaceTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<SurfaceTimingReport> {
        #[cfg(all(feature = "mesh_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "mesh_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "mesh_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "mesh_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "mesh_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Resample => &mut self.report.resample_ns,
            TimingBucket::Triangulation => &mut self.report.triangulation_ns,
            TimingBucket::Assembly => &mut self.report.assembly_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
