// SPDX-License-Identifier: GPL-3.0-only

//! File-backed capture source
//!
//! Streams a list of still images as camera frames, for exercising the
//! scanning engine without camera hardware. Images are resized to the
//! session capture dimensions at open time so every frame matches the
//! converter's expectations.

use std::path::Path;
use std::time::{Duration, Instant};

use image::imageops::FilterType;
use tracing::{debug, info};

use crate::capture::types::{CaptureConfig, RawFrame};
use crate::capture::FrameSource;
use crate::errors::CaptureError;

/// Capture source that cycles image files at the configured framerate
pub struct FileSource {
    config: CaptureConfig,
    frames: Vec<Vec<u32>>,
    cursor: usize,
    streaming: bool,
    closed: bool,
    last_read: Option<Instant>,
}

impl FileSource {
    /// Open a source over the given image files
    ///
    /// Fails with `CaptureError::Unavailable` when no file can be loaded,
    /// mirroring a camera that fails to open.
    pub fn open<P: AsRef<Path>>(
        paths: &[P],
        config: CaptureConfig,
    ) -> Result<Self, CaptureError> {
        if paths.is_empty() {
            return Err(CaptureError::Unavailable("no input files".into()));
        }

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let img = image::open(path).map_err(|e| {
                CaptureError::Unavailable(format!("{}: {}", path.display(), e))
            })?;
            let rgba = image::imageops::resize(
                &img.to_rgba8(),
                config.width,
                config.height,
                FilterType::Triangle,
            );
            let pixels = rgba
                .pixels()
                .map(|p| RawFrame::pack(p[0], p[1], p[2]))
                .collect();
            debug!(path = %path.display(), "loaded frame image");
            frames.push(pixels);
        }

        info!(count = frames.len(), width = config.width, height = config.height,
            "file source opened");

        Ok(Self {
            config,
            frames,
            cursor: 0,
            streaming: false,
            closed: false,
            last_read: None,
        })
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.config.framerate.max(1)))
    }
}

impl FrameSource for FileSource {
    fn config(&self) -> &CaptureConfig {
        &self.config
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        if self.closed {
            return Err(CaptureError::Closed);
        }
        self.streaming = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if self.closed {
            return Err(CaptureError::Closed);
        }
        self.streaming = false;
        self.last_read = None;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<RawFrame>, CaptureError> {
        if self.closed {
            return Err(CaptureError::Closed);
        }
        if !self.streaming {
            return Ok(None);
        }

        // Pace frame delivery to the configured framerate
        if let Some(last) = self.last_read {
            if last.elapsed() < self.frame_interval() {
                return Ok(None);
            }
        }
        self.last_read = Some(Instant::now());

        let pixels = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();

        Ok(Some(RawFrame::from_pixels(
            self.config.width,
            self.config.height,
            pixels,
        )))
    }

    fn close(&mut self) -> Result<(), CaptureError> {
        self.closed = true;
        self.streaming = false;
        self.frames.clear();
        Ok(())
    }
}
