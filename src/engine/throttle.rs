// SPDX-License-Identifier: GPL-3.0-only

//! Adaptive scan throttling
//!
//! The engine measures success density over a fixed window of attempts and
//! retunes its cadence at each window boundary: dense successes mean a user
//! is actively presenting codes and scanning should be responsive; an empty
//! window means idle camera pointing and scanning should back off to save
//! CPU and battery.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::constants::throttle::LOW_SUCCESS_THRESHOLD;

/// Throttle tier derived from one adaptation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleTier {
    /// No successes in the window: maximal delay and skip
    Conserve,
    /// Some successes, below the low-success threshold: moderate backoff
    Sparse,
    /// At or above the threshold: minimal delay, no skipping
    Active,
}

impl ThrottleTier {
    /// Derive the tier from a closed window's success count
    pub fn from_window(successes: u32) -> Self {
        if successes == 0 {
            ThrottleTier::Conserve
        } else if successes < LOW_SUCCESS_THRESHOLD {
            ThrottleTier::Sparse
        } else {
            ThrottleTier::Active
        }
    }

    /// Inter-cycle scan delay for the tier, in milliseconds
    pub fn scan_delay_ms(&self) -> u32 {
        match self {
            ThrottleTier::Conserve => 150,
            ThrottleTier::Sparse => 75,
            // ~30fps processing when codes are coming in
            ThrottleTier::Active => 33,
        }
    }

    /// Frames skipped per processed cycle for the tier
    pub fn skip_frames(&self) -> u32 {
        match self {
            ThrottleTier::Conserve => 2,
            ThrottleTier::Sparse => 1,
            ThrottleTier::Active => 0,
        }
    }
}

/// Rolling counters for the current adaptation window
///
/// Written by the scan worker, read by any consumer. Reset each time the
/// window closes and on a full scanner reset.
#[derive(Debug, Default)]
pub struct ScanStats {
    attempts: AtomicU32,
    successes: AtomicU32,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed scan attempt; returns the new attempt count
    pub fn record_attempt(&self) -> u32 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record one accepted payload
    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    /// Current window counters as (attempts, successes)
    pub fn snapshot(&self) -> (u32, u32) {
        (
            self.attempts.load(Ordering::Relaxed),
            self.successes.load(Ordering::Relaxed),
        )
    }

    /// Zero both counters
    pub fn reset(&self) {
        self.attempts.store(0, Ordering::Relaxed);
        self.successes.store(0, Ordering::Relaxed);
    }
}
