//! Monotonic message counter shared by producers and sinks
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe message counter
/// Only ever increments, except for an explicit reset() to zero
#[derive(Debug, Default)]
pub struct MessageCounter {
    count: AtomicU64,
}

impl MessageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(MessageCounter::new().get(), 0);
    }

    #[test]
    fn increments_by_one() {
        let counter = MessageCounter::new();
        for expected in 1..=10 {
            counter.increment();
            assert_eq!(counter.get(), expected);
        }
    }

    #[test]
    fn reset_returns_to_exactly_zero() {
        let counter = MessageCounter::new();
        for _ in 0..12345 {
            counter.increment();
        }
        counter.reset();
        assert_eq!(counter.get(), 0);

        // Reset of an already zero counter is harmless
        counter.reset();
        assert_eq!(counter.get(), 0);
    }
}
