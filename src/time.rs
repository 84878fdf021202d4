// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Abstraction over the wall clock consumed by the MBC3 real-time clock.
//!
//! The core never calls `SystemTime::now()` directly, so the RTC's advance
//! logic can be driven deterministically in tests.

/// A source of a monotonically-non-decreasing wall-clock second count.
pub trait TimeSource {
    /// Returns the current time as a count of seconds since an
    /// implementation-defined epoch. Must never decrease between calls.
    fn now_secs(&self) -> u64;
}

/// Real wall-clock time, backed by [`std::time::SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A settable clock for deterministic tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestClock {
    secs: u64,
}

impl TestClock {
    /// Create a clock starting at the given second count.
    pub fn new(secs: u64) -> Self {
        TestClock { secs }
    }

    /// Advance the clock by the given number of seconds.
    pub fn advance(&mut self, secs: u64) {
        self.secs = self.secs.saturating_add(secs);
    }

    /// Set the clock to an absolute second count. Ignored if it would move
    /// time backwards, matching the monotonic-non-decreasing contract.
    pub fn set(&mut self, secs: u64) {
        if secs >= self.secs {
            self.secs = secs;
        }
    }
}

impl TimeSource for TestClock {
    fn now_secs(&self) -> u64 {
        self.secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut clock = TestClock::new(100);
        clock.set(50);
        assert_eq!(100, clock.now_secs());
        clock.advance(10);
        assert_eq!(110, clock.now_secs());
    }
}
