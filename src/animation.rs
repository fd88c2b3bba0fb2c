// SPDX-License-Identifier: GPL-3.0-only

//! Scan pulse oscillator
//!
//! Drives the pulsing targeting overlay: a triangular oscillator that steps
//! progress by a fixed amount at most once per tick interval, reversing
//! direction at the [0.0, 1.0] bounds.

use std::time::Duration;

use crate::constants::animation::{PULSE_INTERVAL, PULSE_STEP};

/// Bounded triangular oscillator for UI feedback pulsing
#[derive(Debug, Clone)]
pub struct ScanPulse {
    progress: f32,
    direction: f32,
    since_tick: Duration,
}

impl Default for ScanPulse {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanPulse {
    /// A fresh pulse at progress 0.0, moving upward
    pub fn new() -> Self {
        Self::with_state(0.0, 1.0)
    }

    /// A pulse restored to a known state (progress clamped to [0.0, 1.0])
    pub fn with_state(progress: f32, direction: f32) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            since_tick: Duration::ZERO,
        }
    }

    /// Advance the oscillator by elapsed wall time
    ///
    /// Steps at most once per call, and only once at least the tick interval
    /// has accumulated since the previous step.
    pub fn advance(&mut self, elapsed: Duration) {
        self.since_tick += elapsed;
        if self.since_tick < PULSE_INTERVAL {
            return;
        }
        self.since_tick = Duration::ZERO;

        self.progress += self.direction * PULSE_STEP;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.direction = -1.0;
        } else if self.progress <= 0.0 {
            self.progress = 0.0;
            self.direction = 1.0;
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(50);

    #[test]
    fn test_clamps_at_upper_bound_and_reverses() {
        let mut pulse = ScanPulse::with_state(0.95, 1.0);
        pulse.advance(TICK);
        assert_eq!(pulse.progress(), 1.0);
        assert_eq!(pulse.direction(), -1.0);
        pulse.advance(TICK);
        assert!(pulse.progress() < 1.0);
    }

    #[test]
    fn test_clamps_at_lower_bound_and_reverses() {
        let mut pulse = ScanPulse::with_state(0.05, -1.0);
        pulse.advance(TICK);
        assert_eq!(pulse.progress(), 0.0);
        assert_eq!(pulse.direction(), 1.0);
    }

    #[test]
    fn test_never_leaves_unit_interval() {
        let mut pulse = ScanPulse::new();
        for _ in 0..100 {
            pulse.advance(TICK);
            assert!((0.0..=1.0).contains(&pulse.progress()));
        }
    }

    #[test]
    fn test_short_elapsed_does_not_step() {
        let mut pulse = ScanPulse::new();
        pulse.advance(Duration::from_millis(10));
        assert_eq!(pulse.progress(), 0.0);
        // Accumulated elapsed eventually crosses the tick interval
        pulse.advance(Duration::from_millis(40));
        assert!(pulse.progress() > 0.0);
    }
}
