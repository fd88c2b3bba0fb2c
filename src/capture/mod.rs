// SPDX-License-Identifier: GPL-3.0-only

//! Capture source abstraction
//!
//! A [`FrameSource`] produces raw frames on demand; the [`FrameSlot`] is the
//! single-slot mailbox that hands one frame at a time from the capture side
//! to the scan worker.

pub mod file_source;
pub mod types;

pub use file_source::FileSource;
pub use types::{CaptureConfig, RawFrame};

use std::sync::Mutex;

use crate::errors::CaptureError;

/// A source of raw camera frames
///
/// Opening a concrete source is each implementation's constructor and is the
/// only fatal failure point of the scanning feature. After that, a frame
/// that is not ready yet is a normal condition (`Ok(None)`), retried on the
/// next cycle.
pub trait FrameSource: Send {
    /// The session configuration this source was opened with
    fn config(&self) -> &CaptureConfig;

    /// Start producing frames
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop producing frames; the source stays open and can be restarted
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Read the next frame, or `None` when no new frame is available yet
    fn read_frame(&mut self) -> Result<Option<RawFrame>, CaptureError>;

    /// Release the capture device. Reads after this fail with `Closed`.
    fn close(&mut self) -> Result<(), CaptureError>;
}

/// Single-slot frame mailbox between the capture side and the scan worker
///
/// Publishing replaces any unclaimed frame, so frames are dropped when the
/// worker is still busy with the previous one. Claiming takes the frame and
/// clears the ready token in one step.
#[derive(Debug, Default)]
pub struct FrameSlot {
    frame: Mutex<Option<RawFrame>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand a frame to the worker, replacing any unclaimed one
    pub fn publish(&self, frame: RawFrame) {
        *self.frame.lock().unwrap() = Some(frame);
    }

    /// Claim the pending frame, clearing the ready token
    pub fn claim(&self) -> Option<RawFrame> {
        self.frame.lock().unwrap().take()
    }

    /// Drop any pending frame without claiming it
    pub fn clear(&self) {
        *self.frame.lock().unwrap() = None;
    }

    /// Whether a frame is waiting to be claimed
    pub fn is_ready(&self) -> bool {
        self.frame.lock().unwrap().is_some()
    }
}
