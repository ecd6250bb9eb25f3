//! Observation registry seam
//! A registry records one timed observation per observed operation. The
//! no-op registry records nothing, and callers may skip observing entirely
//! when they see one.
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Observation registry trait
pub trait ObservationRegistry: Send + Sync {
    /// True if observations are discarded
    fn is_noop(&self) -> bool {
        false
    }

    /// Record a completed observation
    fn record(&self, name: &str, elapsed: Duration, failed: bool);
}

/// Registry which discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObservationRegistry;

impl NoopObservationRegistry {
    /// Shared no-op registry, ready to hand to a producer
    pub fn shared() -> Arc<dyn ObservationRegistry> {
        Arc::new(NoopObservationRegistry)
    }
}

impl ObservationRegistry for NoopObservationRegistry {
    fn is_noop(&self) -> bool {
        true
    }

    fn record(&self, _name: &str, _elapsed: Duration, _failed: bool) {}
}

struct Started<'a> {
    registry: &'a dyn ObservationRegistry,
    name: &'a str,
    start: Instant,
}

/// A single in-flight observation
/// Against a no-op registry this holds nothing and stop() does nothing
pub struct Observation<'a> {
    started: Option<Started<'a>>,
}

impl<'a> Observation<'a> {
    /// Start observing `name` against the given registry
    pub fn start(registry: &'a dyn ObservationRegistry, name: &'a str) -> Self {
        if registry.is_noop() {
            return Self::noop();
        }

        Self {
            started: Some(Started {
                registry,
                name,
                start: Instant::now(),
            }),
        }
    }

    pub fn noop() -> Self {
        Self { started: None }
    }

    pub fn is_noop(&self) -> bool {
        self.started.is_none()
    }

    /// Finish, recording elapsed time and outcome
    pub fn stop(self, failed: bool) {
        if let Some(started) = self.started {
            started
                .registry
                .record(started.name, started.start.elapsed(), failed);
        }
    }
}
