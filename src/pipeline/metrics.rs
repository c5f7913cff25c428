use crate::error::FaultClass;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters describing how model loads resolved
///
/// Diagnostic only; nothing in the pipeline reads these back.
#[derive(Debug, Default)]
pub struct LoadMetrics {
    load_times: RwLock<HashMap<String, Duration>>,
    attempts: AtomicU64,
    transport_faults: AtomicU64,
    container_faults: AtomicU64,
    semantic_faults: AtomicU64,
    timeouts: AtomicU64,
    real_loads: AtomicU64,
    placeholders: AtomicU64,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one candidate-path fetch
    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed candidate path
    pub fn record_fault(&self, class: FaultClass) {
        let counter = match class {
            FaultClass::Transport => &self.transport_faults,
            FaultClass::Container => &self.container_faults,
            FaultClass::Semantic => &self.semantic_faults,
            // programmer errors never reach the candidate loop
            FaultClass::Programmer => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful real load and how long the winning path took
    pub fn record_real_load(&self, path: &str, duration: Duration) {
        self.real_loads.fetch_add(1, Ordering::Relaxed);
        self.load_times.write().insert(path.to_string(), duration);
    }

    pub fn record_placeholder(&self) {
        self.placeholders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn transport_faults(&self) -> u64 {
        self.transport_faults.load(Ordering::Relaxed)
    }

    pub fn container_faults(&self) -> u64 {
        self.container_faults.load(Ordering::Relaxed)
    }

    pub fn semantic_faults(&self) -> u64 {
        self.semantic_faults.load(Ordering::Relaxed)
    }

    /// Timeouts are also counted as transport faults
    pub fn timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    pub fn real_loads(&self) -> u64 {
        self.real_loads.load(Ordering::Relaxed)
    }

    pub fn placeholders(&self) -> u64 {
        self.placeholders.load(Ordering::Relaxed)
    }

    /// Share of completed loads that fell back to a placeholder, in percent
    pub fn placeholder_rate(&self) -> f32 {
        let real = self.real_loads() as f32;
        let placeholders = self.placeholders() as f32;

        if real + placeholders > 0.0 {
            placeholders / (real + placeholders) * 100.0
        } else {
            0.0
        }
    }

    /// Load time of the last real load served from `path`
    pub fn load_time(&self, path: &str) -> Option<Duration> {
        self.load_times.read().get(path).cloned()
    }

    pub fn all_load_times(&self) -> HashMap<String, Duration> {
        self.load_times.read().clone()
    }
}

/// A thread-safe wrapper around LoadMetrics
#[derive(Debug, Clone, Default)]
pub struct LoadMetricsHandle(Arc<LoadMetrics>);

impl LoadMetricsHandle {
    pub fn new() -> Self {
        Self(Arc::new(LoadMetrics::new()))
    }

    /// Get a reference to the underlying metrics
    pub fn inner(&self) -> &LoadMetrics {
        &self.0
    }
}

impl std::ops::Deref for LoadMetricsHandle {
    type Target = LoadMetrics;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
