// SPDX-License-Identifier: GPL-3.0-only

//! Engine-wide constants

/// Capture constants
pub mod capture {
    use std::time::Duration;

    /// Logical capture width used for scanning
    pub const CAM_WIDTH: u32 = 640;

    /// Logical capture height used for scanning
    pub const CAM_HEIGHT: u32 = 360;

    /// Default capture framerate
    pub const FRAMERATE: u32 = 30;

    /// Wait applied to cycles that skip all scan work (~one 60 Hz refresh)
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
}

/// Payload validation constants
pub mod scan {
    /// Hard upper bound on an accepted payload, in bytes
    pub const MAX_PAYLOAD_LEN: usize = 4096;

    /// Non-URL payloads at or above this length are rejected.
    ///
    /// Tunable heuristic: short free-text payloads pass, oversized
    /// non-URL blobs do not.
    pub const GENERIC_ACCEPT_LIMIT: usize = 256;

    /// Maximum symbols examined per cycle (primary candidate + 3 fallbacks)
    pub const MAX_CANDIDATES: usize = 4;

    /// Payload prefixes accepted unconditionally
    pub const URL_PREFIXES: [&[u8]; 4] = [b"http", b"HTTP", b"ftp:", b"FTP:"];
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// Default inter-cycle scan delay in milliseconds
    pub const DEFAULT_SCAN_DELAY_MS: u32 = 50;

    /// Lower clamp for a caller-requested scan delay
    pub const MIN_SCAN_DELAY_MS: u32 = 10;

    /// Upper clamp for a caller-requested scan delay
    pub const MAX_SCAN_DELAY_MS: u32 = 1000;

    /// Quiet period after an accepted payload, before scanning resumes
    pub const COOLDOWN: Duration = Duration::from_millis(50);

    /// Cycles completing faster than this are considered too fast
    pub const FAST_CYCLE_GUARD: Duration = Duration::from_millis(20);

    /// Extra delay in milliseconds applied to too-fast cycles
    pub const FAST_CYCLE_PENALTY_MS: u32 = 10;
}

/// Adaptive throttling constants
pub mod throttle {
    /// Scan attempts per adaptation window
    pub const WINDOW_ATTEMPTS: u32 = 100;

    /// Windows with fewer successes than this are treated as sparse
    pub const LOW_SUCCESS_THRESHOLD: u32 = 5;
}

/// Scan pulse animation constants
pub mod animation {
    use std::time::Duration;

    /// Progress step applied per pulse tick
    pub const PULSE_STEP: f32 = 0.1;

    /// Minimum interval between pulse ticks
    pub const PULSE_INTERVAL: Duration = Duration::from_millis(50);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_clamp_range() {
        assert!(timing::MIN_SCAN_DELAY_MS < timing::DEFAULT_SCAN_DELAY_MS);
        assert!(timing::DEFAULT_SCAN_DELAY_MS < timing::MAX_SCAN_DELAY_MS);
    }

    #[test]
    fn test_generic_limit_below_payload_bound() {
        assert!(scan::GENERIC_ACCEPT_LIMIT < scan::MAX_PAYLOAD_LEN);
    }
}
