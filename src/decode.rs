// SPDX-License-Identifier: GPL-3.0-only

//! Symbol decoder capability
//!
//! The engine treats QR symbol decoding as an opaque capability: given a
//! luminance bitmap, locate zero or more symbols, then decode them by index.
//! [`RqrrDecoder`] adapts the `rqrr` crate to this contract; tests supply
//! scripted implementations.

use std::fmt;

use tracing::trace;

use crate::convert::LuminanceBitmap;

/// A decoded symbol payload, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub payload: Vec<u8>,
}

/// Per-candidate decode failure
///
/// Non-fatal: a failed candidate is simply disqualified for the cycle.
#[derive(Debug, Clone)]
pub enum DecodeError {
    /// The requested index was not located in the last pass
    OutOfRange { index: usize, count: usize },
    /// The symbol was located but its content could not be read
    Unreadable(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::OutOfRange { index, count } => {
                write!(f, "Symbol index {} out of range ({} located)", index, count)
            }
            DecodeError::Unreadable(msg) => write!(f, "Symbol unreadable: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Opaque symbol decoding capability
pub trait SymbolDecoder: Send {
    /// Locate symbols in the bitmap; returns how many were found
    fn locate(&mut self, bitmap: &LuminanceBitmap) -> usize;

    /// Decode a symbol located by the most recent `locate` call
    fn decode(&mut self, index: usize) -> Result<Candidate, DecodeError>;
}

/// `rqrr`-backed decoder
///
/// rqrr's located grids borrow the prepared image, so the content of every
/// grid is read during `locate` and served per index afterwards.
#[derive(Debug, Default)]
pub struct RqrrDecoder {
    results: Vec<Result<Vec<u8>, String>>,
}

impl RqrrDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymbolDecoder for RqrrDecoder {
    fn locate(&mut self, bitmap: &LuminanceBitmap) -> usize {
        let width = bitmap.width() as usize;
        let height = bitmap.height() as usize;
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            bitmap.sample(x, y)
        });

        self.results = prepared
            .detect_grids()
            .iter()
            .map(|grid| {
                grid.decode()
                    .map(|(_meta, content)| content.into_bytes())
                    .map_err(|e| e.to_string())
            })
            .collect();

        trace!(count = self.results.len(), "located symbols");
        self.results.len()
    }

    fn decode(&mut self, index: usize) -> Result<Candidate, DecodeError> {
        match self.results.get(index) {
            Some(Ok(payload)) => Ok(Candidate {
                payload: payload.clone(),
            }),
            Some(Err(msg)) => Err(DecodeError::Unreadable(msg.clone())),
            None => Err(DecodeError::OutOfRange {
                index,
                count: self.results.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_before_locate_is_out_of_range() {
        let mut decoder = RqrrDecoder::new();
        assert!(matches!(
            decoder.decode(0),
            Err(DecodeError::OutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_blank_bitmap_locates_nothing() {
        let mut decoder = RqrrDecoder::new();
        let mut converter = crate::convert::LumaConverter::new(64, 64);
        let frame = crate::capture::RawFrame::new(64, 64);
        let bitmap = converter.convert(&frame).unwrap();
        assert_eq!(decoder.locate(bitmap), 0);
    }
}
