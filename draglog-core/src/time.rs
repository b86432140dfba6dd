//! Time source abstraction for the acquisition loop
//!
//! Log records carry milliseconds since boot, not wall-clock time: the rig
//! has no RTC and a run is only ever read relative to its own start. The
//! trait exists so tests can drive the clock by hand.

/// Timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Source of the per-sample timestamp
pub trait TimeSource {
    /// Current milliseconds since boot
    fn now(&self) -> Timestamp;
}

/// Fixed time source for testing
///
/// Reports whatever it was last told; tests advance it between cycles.
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a source pinned at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Monotonic clock counting from construction (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct UptimeClock {
    started: std::time::Instant,
}

#[cfg(feature = "std")]
impl UptimeClock {
    /// Start counting now
    pub fn new() -> Self {
        Self {
            started: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for UptimeClock {
    fn now(&self) -> Timestamp {
        self.started.elapsed().as_millis() as Timestamp
    }
}
