// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the scanning engine

use std::fmt;

/// Result type alias using ScanError
pub type ScannerResult<T> = Result<T, ScanError>;

/// Top-level error type for engine operations
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Capture-related errors
    Capture(CaptureError),
    /// Frame conversion errors
    Convert(ConvertError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Capture-specific errors
///
/// A frame that is simply not ready yet is not an error; sources report
/// that case as `Ok(None)` from `read_frame` and the engine retries.
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The capture device could not be opened. Fatal to the scanning
    /// feature; the rest of the application continues without it.
    Unavailable(String),
    /// The source was used after being closed
    Closed,
    /// I/O failure while reading from the source
    Io(String),
}

/// Frame conversion errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Frame dimensions do not match the converter's session dimensions
    InvalidDimensions {
        expected: (u32, u32),
        got: (u32, u32),
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Capture(e) => write!(f, "Capture error: {}", e),
            ScanError::Convert(e) => write!(f, "Conversion error: {}", e),
            ScanError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ScanError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Unavailable(msg) => write!(f, "Capture unavailable: {}", msg),
            CaptureError::Closed => write!(f, "Capture source is closed"),
            CaptureError::Io(msg) => write!(f, "Capture I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidDimensions { expected, got } => write!(
                f,
                "Invalid frame dimensions: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
        }
    }
}

impl std::error::Error for ScanError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for ConvertError {}

// Conversions from sub-errors to ScanError
impl From<CaptureError> for ScanError {
    fn from(err: CaptureError) -> Self {
        ScanError::Capture(err)
    }
}

impl From<ConvertError> for ScanError {
    fn from(err: ConvertError) -> Self {
        ScanError::Convert(err)
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err.to_string())
    }
}

impl From<String> for ScanError {
    fn from(msg: String) -> Self {
        ScanError::Other(msg)
    }
}

impl From<&str> for ScanError {
    fn from(msg: &str) -> Self {
        ScanError::Other(msg.to_string())
    }
}
