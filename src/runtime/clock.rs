use std::{cell::Cell, rc::Rc, time::Duration};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
/// Milliseconds since the start of the playback timeline.
pub struct TimePoint(pub u64);

impl TimePoint {
    /// Timeline origin.
    pub const ZERO: Self = Self(0);

    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// The point `d` after `self`, saturating at the end of the timeline.
    pub fn after(self, d: Duration) -> Self {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ms))
    }

    /// Time elapsed since `earlier`; zero if `earlier` is in the future.
    pub fn since(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Source of the current timeline position.
///
/// All sequencer timing goes through this trait so playback can be driven by simulated time.
pub trait Clock {
    fn now(&self) -> TimePoint;
}

/// Monotonic wall clock anchored at construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimePoint {
        TimePoint(u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX))
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one handle and give
/// another to the engine.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, t: TimePoint) {
        self.now.set(t.0);
    }

    pub fn advance(&self, d: Duration) {
        self.set(TimePoint(self.now.get()).after(d));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimePoint {
        TimePoint(self.now.get())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/clock.rs"]
mod tests;
