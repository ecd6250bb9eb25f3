//! Observation registry which records counts and timings per observed
//! component
use channel_bench_sdk::ObservationRegistry;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Default, Clone)]
struct ObservationStats {
    count: u64,
    failed: u64,
    total: Duration,
}

/// Summary of the observations recorded for one component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSnapshot {
    pub count: u64,
    pub failed: u64,
    pub total_ns: u64,
    pub mean_ns: f64,
}

/// Recording registry
#[derive(Default)]
pub struct RecordingRegistry {
    observations: DashMap<String, ObservationStats>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far
    pub fn reset(&self) {
        self.observations.clear();
    }

    /// Current state, by component name
    pub fn snapshot(&self) -> BTreeMap<String, ObservationSnapshot> {
        self.observations
            .iter()
            .map(|kvp| {
                let (name, stats) = kvp.pair();
                let total_ns = u64::try_from(stats.total.as_nanos()).unwrap_or(u64::MAX);
                let mean_ns = if stats.count > 0 {
                    total_ns as f64 / stats.count as f64
                } else {
                    0.0
                };
                let snapshot = ObservationSnapshot {
                    count: stats.count,
                    failed: stats.failed,
                    total_ns,
                    mean_ns,
                };
                (name.clone(), snapshot)
            })
            .collect()
    }
}

impl ObservationRegistry for RecordingRegistry {
    fn record(&self, name: &str, elapsed: Duration, failed: bool) {
        // Avoid allocating the key once the entry exists
        let mut stats = match self.observations.get_mut(name) {
            Some(stats) => stats,
            None => self.observations.entry(name.to_string()).or_default(),
        };
        stats.count += 1;
        stats.total += elapsed;
        if failed {
            stats.failed += 1;
        }
    }
}
