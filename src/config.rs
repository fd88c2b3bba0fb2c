// SPDX-License-Identifier: GPL-3.0-only

//! User configuration handling

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::capture::CaptureConfig;
use crate::constants::{capture, timing};
use crate::errors::{ScanError, ScannerResult};

/// Persisted scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Capture width in pixels
    pub width: u32,
    /// Capture height in pixels
    pub height: u32,
    /// Capture framerate
    pub framerate: u32,
    /// Inter-cycle scan delay in milliseconds
    pub scan_delay_ms: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            width: capture::CAM_WIDTH,
            height: capture::CAM_HEIGHT,
            framerate: capture::FRAMERATE,
            scan_delay_ms: timing::DEFAULT_SCAN_DELAY_MS,
        }
    }
}

impl ScannerConfig {
    /// Path of the configuration file, when a config directory exists
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("qr-scanner").join("config.json"))
    }

    /// Load the configuration, falling back to defaults
    ///
    /// A missing file is normal (first run). A corrupt file is logged and
    /// replaced by defaults rather than failing the application.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt config");
                Self::default()
            }
        }
    }

    /// Write the configuration to disk
    pub fn save(&self) -> ScannerResult<()> {
        let path = Self::path()
            .ok_or_else(|| ScanError::Config("no config directory available".into()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ScanError::Config(format!("{}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::Config(e.to_string()))?;
        fs::write(&path, contents).map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// The capture configuration described by these settings
    pub fn capture(&self) -> CaptureConfig {
        CaptureConfig {
            width: self.width,
            height: self.height,
            framerate: self.framerate,
        }
    }
}
