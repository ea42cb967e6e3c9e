//! Monotonic time source used to time fit+predict

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic reading relative to an arbitrary origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock that advances by `step` on every reading
#[derive(Debug)]
pub struct StepClock {
    step: Duration,
    ticks: AtomicU64,
}

impl StepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            ticks: AtomicU64::new(0),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> Duration {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        let tick = u32::try_from(tick).unwrap_or(u32::MAX);
        self.step.saturating_mul(tick)
    }
}
