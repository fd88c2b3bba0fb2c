// SPDX-License-Identifier: GPL-3.0-only

//! Raw frame to luminance bitmap conversion
//!
//! The decoder capability consumes a single-channel brightness image. The
//! conversion is fixed-point integer only so identical input frames always
//! produce identical bitmaps on any hardware.

use crate::capture::RawFrame;
use crate::errors::ConvertError;

/// Single-channel luminance image, one byte per pixel
#[derive(Debug, Clone)]
pub struct LuminanceBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl LuminanceBitmap {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance sample at (x, y)
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width as usize + x]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Weighted integer luminance: `(r*76 + g*150 + b*30) >> 8`
///
/// Approximates ITU luma weighting without floating point.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 76 + u32::from(g) * 150 + u32::from(b) * 30) >> 8) as u8
}

/// Converts raw frames into a reused luminance bitmap
///
/// The output buffer is allocated once for the session dimensions and
/// overwritten on every conversion; no per-frame allocation.
#[derive(Debug)]
pub struct LumaConverter {
    bitmap: LuminanceBitmap,
}

impl LumaConverter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bitmap: LuminanceBitmap::new(width, height),
        }
    }

    /// Convert a frame, processing every pixel exactly once
    pub fn convert(&mut self, frame: &RawFrame) -> Result<&LuminanceBitmap, ConvertError> {
        if frame.width != self.bitmap.width || frame.height != self.bitmap.height {
            return Err(ConvertError::InvalidDimensions {
                expected: (self.bitmap.width, self.bitmap.height),
                got: (frame.width, frame.height),
            });
        }

        for (out, &sample) in self.bitmap.data.iter_mut().zip(frame.pixels.iter()) {
            let (r, g, b) = RawFrame::channels(sample);
            *out = luma(r, g, b);
        }

        Ok(&self.bitmap)
    }
}
