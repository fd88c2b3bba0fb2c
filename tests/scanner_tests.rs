// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the scanning engine
//!
//! Drives a real worker thread through stub capture and decoder
//! implementations of the public traits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use qr_scanner::{
    Candidate, CaptureConfig, CaptureError, DecodeError, FrameSource, LuminanceBitmap, RawFrame,
    ScanQuality, Scanner, SymbolDecoder,
};

const DIM: u32 = 16;

/// Source that serves a queue of preloaded frames
struct StubSource {
    config: CaptureConfig,
    frames: Arc<Mutex<VecDeque<RawFrame>>>,
    streaming: bool,
    closed: bool,
}

impl StubSource {
    fn new(frames: Vec<RawFrame>) -> (Self, Arc<Mutex<VecDeque<RawFrame>>>) {
        let queue = Arc::new(Mutex::new(VecDeque::from(frames)));
        (
            Self {
                config: CaptureConfig {
                    width: DIM,
                    height: DIM,
                    framerate: 30,
                },
                frames: Arc::clone(&queue),
                streaming: false,
                closed: false,
            },
            queue,
        )
    }
}

impl FrameSource for StubSource {
    fn config(&self) -> &CaptureConfig {
        &self.config
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        self.streaming = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.streaming = false;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<RawFrame>, CaptureError> {
        if self.closed {
            return Err(CaptureError::Closed);
        }
        if !self.streaming {
            return Ok(None);
        }
        Ok(self.frames.lock().unwrap().pop_front())
    }

    fn close(&mut self) -> Result<(), CaptureError> {
        self.closed = true;
        self.streaming = false;
        Ok(())
    }
}

/// Decoder that reports one symbol on bright frames and none otherwise
#[derive(Default)]
struct StubDecoder {
    bright: bool,
}

impl SymbolDecoder for StubDecoder {
    fn locate(&mut self, bitmap: &LuminanceBitmap) -> usize {
        self.bright = bitmap.sample(0, 0) == 200;
        usize::from(self.bright)
    }

    fn decode(&mut self, index: usize) -> Result<Candidate, DecodeError> {
        if self.bright && index == 0 {
            Ok(Candidate {
                payload: b"http://example.com".to_vec(),
            })
        } else {
            Err(DecodeError::OutOfRange { index, count: 0 })
        }
    }
}

fn solid_frame(level: u8) -> RawFrame {
    let pixels = vec![RawFrame::pack(level, level, level); (DIM * DIM) as usize];
    RawFrame::from_pixels(DIM, DIM, pixels)
}

fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_two_frame_scan_scenario() {
    // Frame 1 carries no symbol; frame 2 decodes to a URL
    let (source, _queue) = StubSource::new(vec![solid_frame(0), solid_frame(200)]);
    let mut scanner = Scanner::open(Box::new(source), Box::new(StubDecoder::default()))
        .expect("engine should start");
    scanner.set_scan_delay(10);
    scanner.start_scanning().unwrap();
    assert!(scanner.is_running());

    scanner.fetch_frame().unwrap().expect("first frame");
    assert!(
        wait_for(TIMEOUT, || scanner.stats().0 >= 1),
        "empty frame should still count as an attempt"
    );
    let (_, scanned) = scanner.last_result();
    assert!(!scanned);

    scanner.fetch_frame().unwrap().expect("second frame");
    assert!(
        wait_for(TIMEOUT, || scanner.last_result().1),
        "bright frame should produce an accepted payload"
    );

    let (payload, scanned) = scanner.last_result();
    assert_eq!(payload, b"http://example.com");
    assert!(scanned);
    assert_eq!(ScanQuality::classify(payload.len()), ScanQuality::Fair);

    // Acknowledging clears the flag but keeps the payload for replay
    scanner.acknowledge_result();
    let (payload, scanned) = scanner.last_result();
    assert_eq!(payload, b"http://example.com");
    assert!(!scanned);

    scanner.stop_scanning().unwrap();
    scanner.shutdown();
    assert!(!scanner.is_running());
}

#[test]
fn test_reset_gives_a_fresh_session() {
    let (source, queue) = StubSource::new(vec![solid_frame(200)]);
    let mut scanner =
        Scanner::open(Box::new(source), Box::new(StubDecoder::default())).unwrap();
    scanner.set_scan_delay(10);
    scanner.start_scanning().unwrap();

    scanner.fetch_frame().unwrap();
    assert!(wait_for(TIMEOUT, || scanner.last_result().1));

    scanner.set_scan_delay(200);
    scanner.reset();
    let (payload, scanned) = scanner.last_result();
    assert!(payload.is_empty());
    assert!(!scanned);
    assert_eq!(scanner.stats(), (0, 0));
    assert_eq!(scanner.scan_delay(), 50, "reset restores the default delay");

    // The same payload is accepted again after a reset
    queue.lock().unwrap().push_back(solid_frame(200));
    scanner.fetch_frame().unwrap();
    assert!(wait_for(TIMEOUT, || scanner.last_result().1));
    assert_eq!(scanner.last_result().0, b"http://example.com");

    scanner.shutdown();
}

#[test]
fn test_scan_delay_is_clamped() {
    let (source, _queue) = StubSource::new(vec![]);
    let mut scanner =
        Scanner::open(Box::new(source), Box::new(StubDecoder::default())).unwrap();

    scanner.set_scan_delay(1);
    assert_eq!(scanner.scan_delay(), 10);
    scanner.set_scan_delay(5000);
    assert_eq!(scanner.scan_delay(), 1000);
    scanner.set_scan_delay(75);
    assert_eq!(scanner.scan_delay(), 75);

    scanner.shutdown();
}

#[test]
fn test_fetch_without_streaming_returns_no_frame() {
    let (source, _queue) = StubSource::new(vec![solid_frame(0)]);
    let mut scanner =
        Scanner::open(Box::new(source), Box::new(StubDecoder::default())).unwrap();

    // Capture has not been started yet
    assert!(scanner.fetch_frame().unwrap().is_none());

    scanner.start_scanning().unwrap();
    assert!(scanner.fetch_frame().unwrap().is_some());

    scanner.shutdown();
}
