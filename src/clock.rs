//! Tick-based timekeeping for policy hosts
//!
//! Policies never read a clock themselves; every `schedule` call carries the
//! current tick from the caller. This module provides tick sources for hosts
//! that drive policies from wall-clock time and for tests that need exact
//! control over time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Time value in host-defined tick units
///
/// Ticks are opaque to the policies: simulated picoseconds, nanoseconds and
/// cycle counts all work, as long as the monitoring window and the tick
/// values fed to `schedule` use the same unit.
pub type Tick = u64;

/// Source of the current tick for a policy-driving host
pub trait TickSource: Send {
    /// Get the current tick
    ///
    /// Values must never decrease between calls on the same source.
    fn now(&self) -> Tick;
}

/// Wall-clock tick source with one tick per elapsed nanosecond
///
/// Ticks are relative to the moment the source was created.
///
/// # Example
/// ```
/// use sluice::clock::{MonotonicTicks, TickSource};
///
/// let clock = MonotonicTicks::new();
/// let start = clock.now();
/// // ... do work ...
/// let elapsed = clock.now() - start;
/// println!("Elapsed: {elapsed} ticks");
/// ```
pub struct MonotonicTicks {
    start: Instant,
}

impl MonotonicTicks {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicTicks {
    #[inline]
    fn now(&self) -> Tick {
        self.start.elapsed().as_nanos() as Tick
    }
}

/// Manually advanced tick source for tests and discrete-event hosts
///
/// # Example
/// ```
/// use sluice::clock::{ManualTicks, TickSource};
///
/// let clock = ManualTicks::new();
/// clock.advance(500);
/// assert_eq!(clock.now(), 500);
/// ```
pub struct ManualTicks {
    current: AtomicU64,
}

impl ManualTicks {
    /// Create a source starting at tick 0
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a source starting at the given tick
    pub fn starting_at(tick: Tick) -> Self {
        Self { current: AtomicU64::new(tick) }
    }

    /// Advance the tick by `delta` and return the new value
    pub fn advance(&self, delta: Tick) -> Tick {
        self.current.fetch_add(delta, Ordering::Relaxed) + delta
    }

    /// Jump to an absolute tick
    ///
    /// Callers must not move the tick backwards.
    pub fn set(&self, tick: Tick) {
        self.current.store(tick, Ordering::Relaxed);
    }
}

impl Default for ManualTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for ManualTicks {
    #[inline]
    fn now(&self) -> Tick {
        self.current.load(Ordering::Relaxed)
    }
}
