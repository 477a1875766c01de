//! Platform abstraction for time.
//!
//! The engine measures everything in milliseconds since a host-chosen epoch.
//! Hosts that run against the wall clock use [`SystemClock`]; tests and
//! replay tools drive a [`ManualClock`] so that deadlines fire
//! deterministically.

use std::cell::Cell;

/// Provides timing information for the gesture engine.
pub trait Clock {
    /// Instant type produced by this clock implementation.
    type Instant: Copy;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}

/// Wall clock backed by `web_time::Instant`, which also works on wasm.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }

    /// Milliseconds since this clock was created; suitable as a sample timestamp.
    pub fn uptime_millis(&self) -> u64 {
        self.elapsed_millis(self.origin)
    }
}

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> Self::Instant {
        web_time::Instant::now()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        let millis = web_time::Instant::now()
            .saturating_duration_since(since)
            .as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Cell::new(start_millis),
        }
    }

    /// Moves the clock forward by `millis` and returns the new time.
    pub fn advance(&self, millis: u64) -> u64 {
        let next = self.now.get().saturating_add(millis);
        self.now.set(next);
        next
    }

    /// Sets the clock to `millis`; never moves backwards.
    pub fn set(&self, millis: u64) {
        if millis > self.now.get() {
            self.now.set(millis);
        }
    }
}

impl Clock for ManualClock {
    type Instant = u64;

    fn now(&self) -> u64 {
        self.now.get()
    }

    fn elapsed_millis(&self, since: u64) -> u64 {
        self.now.get().saturating_sub(since)
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
