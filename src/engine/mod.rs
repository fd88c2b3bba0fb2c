// SPDX-License-Identifier: GPL-3.0-only

//! Scanning engine
//!
//! The engine runs a dedicated worker thread that repeatedly claims a frame
//! from the capture mailbox, converts it to luminance, asks the decoder
//! capability for symbols, validates and deduplicates the payloads, and
//! publishes accepted results to the shared store. The worker paces itself
//! with sleep-based delays and retunes its own cadence from the success
//! density of the last adaptation window.

pub mod throttle;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::capture::{FrameSlot, FrameSource, RawFrame};
use crate::constants::capture::FRAME_INTERVAL;
use crate::constants::scan::{GENERIC_ACCEPT_LIMIT, MAX_CANDIDATES, MAX_PAYLOAD_LEN, URL_PREFIXES};
use crate::constants::throttle::WINDOW_ATTEMPTS;
use crate::constants::timing::{
    COOLDOWN, DEFAULT_SCAN_DELAY_MS, FAST_CYCLE_GUARD, FAST_CYCLE_PENALTY_MS, MAX_SCAN_DELAY_MS,
    MIN_SCAN_DELAY_MS,
};
use crate::convert::LumaConverter;
use crate::decode::SymbolDecoder;
use crate::errors::{CaptureError, ScanError, ScannerResult};
use crate::store::ResultStore;
use throttle::{ScanStats, ThrottleTier};

/// Phase of the scan cycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    /// No frame claimed
    #[default]
    Idle,
    /// Waiting for the next available frame
    Capturing,
    /// Producing the luminance bitmap
    Converting,
    /// Running the decoder capability and validation
    Decoding,
    /// Post-acceptance quiet period
    Cooldown,
}

/// Injectable time source for the worker loop
///
/// The loop is polling with sleep-based delays; routing time through a trait
/// keeps the cycle logic testable without wall-clock waits.
pub trait Clock: Send {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation used by the running engine
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Validation predicate applied to every decoded candidate
///
/// Two tiers: URL-prefixed payloads are accepted unconditionally (up to the
/// hard bound); anything else passes only below the generic-acceptance
/// limit, which admits short free-text codes while rejecting oversized
/// non-URL blobs.
pub fn is_acceptable_payload(payload: &[u8]) -> bool {
    let len = payload.len();
    if len == 0 || len >= MAX_PAYLOAD_LEN {
        return false;
    }
    if len > 4 && URL_PREFIXES.iter().any(|prefix| payload.starts_with(prefix)) {
        return true;
    }
    len < GENERIC_ACCEPT_LIMIT
}

/// State shared between the worker thread and the engine handle
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) slot: FrameSlot,
    pub(crate) store: ResultStore,
    pub(crate) stats: ScanStats,
    pub(crate) scan_delay_ms: AtomicU32,
    pub(crate) skip_frames: AtomicU32,
    pub(crate) stop: AtomicBool,
}

impl Shared {
    fn new() -> Self {
        Self {
            slot: FrameSlot::new(),
            store: ResultStore::new(),
            stats: ScanStats::new(),
            scan_delay_ms: AtomicU32::new(DEFAULT_SCAN_DELAY_MS),
            skip_frames: AtomicU32::new(0),
            stop: AtomicBool::new(false),
        }
    }
}

/// One worker's view of the scanning loop
pub(crate) struct ScanWorker<C: Clock> {
    shared: Arc<Shared>,
    decoder: Box<dyn SymbolDecoder>,
    converter: LumaConverter,
    clock: C,
    phase: ScanPhase,
    skip_counter: u32,
    last_frame_at: Option<Instant>,
}

impl<C: Clock> ScanWorker<C> {
    pub(crate) fn new(
        shared: Arc<Shared>,
        decoder: Box<dyn SymbolDecoder>,
        width: u32,
        height: u32,
        clock: C,
    ) -> Self {
        Self {
            shared,
            decoder,
            converter: LumaConverter::new(width, height),
            clock,
            phase: ScanPhase::Idle,
            skip_counter: 0,
            last_frame_at: None,
        }
    }

    fn into_decoder(self) -> Box<dyn SymbolDecoder> {
        self.decoder
    }

    /// Run one iteration of the scan loop
    ///
    /// A cycle either skips (policy says so, or no frame is ready) or walks
    /// the full capture, convert, decode path. All waiting goes through the
    /// injected clock.
    pub(crate) fn run_cycle(&mut self) {
        // Frame skipping: cycles below the skip threshold do no scan work
        self.skip_counter += 1;
        if self.skip_counter <= self.shared.skip_frames.load(Ordering::Relaxed) {
            self.clock.sleep(FRAME_INTERVAL);
            return;
        }
        self.skip_counter = 0;

        // Inter-cycle delay, padded when the previous frame was processed
        // less than the guard interval ago
        let mut delay_ms = self.shared.scan_delay_ms.load(Ordering::Relaxed);
        if let Some(last) = self.last_frame_at {
            if self.clock.now().duration_since(last) < FAST_CYCLE_GUARD {
                delay_ms += FAST_CYCLE_PENALTY_MS;
            }
        }
        self.clock.sleep(Duration::from_millis(u64::from(delay_ms)));

        self.phase = ScanPhase::Capturing;
        let Some(frame) = self.shared.slot.claim() else {
            // Not ready yet: a normal condition, retried next cycle
            return;
        };
        self.last_frame_at = Some(self.clock.now());

        self.phase = ScanPhase::Converting;
        let bitmap = match self.converter.convert(&frame) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!(error = %e, "dropping unconvertible frame");
                self.phase = ScanPhase::Idle;
                return;
            }
        };

        self.phase = ScanPhase::Decoding;
        let attempts = self.shared.stats.record_attempt();
        let located = self.decoder.locate(bitmap);

        // Primary candidate first, then a bounded number of fallbacks in
        // ascending index order, stopping at the first acceptance
        let mut accepted = false;
        for index in 0..located.min(MAX_CANDIDATES) {
            match self.decoder.decode(index) {
                Ok(candidate) if is_acceptable_payload(&candidate.payload) => {
                    if self.shared.store.publish(&candidate.payload) {
                        self.shared.stats.record_success();
                        accepted = true;
                        break;
                    }
                }
                Ok(_) => {
                    // Validation rejected: discard silently
                }
                Err(e) => {
                    debug!(index, error = %e, "candidate failed to decode");
                }
            }
        }

        self.retune_if_window_closed(attempts);

        if accepted {
            self.phase = ScanPhase::Cooldown;
            self.clock.sleep(COOLDOWN);
        }
        self.phase = ScanPhase::Idle;
    }

    /// Close the adaptation window and retune the throttle policy
    fn retune_if_window_closed(&mut self, attempts: u32) {
        if attempts < WINDOW_ATTEMPTS {
            return;
        }
        let (_, successes) = self.shared.stats.snapshot();
        let tier = ThrottleTier::from_window(successes);
        self.shared
            .scan_delay_ms
            .store(tier.scan_delay_ms(), Ordering::Relaxed);
        self.shared
            .skip_frames
            .store(tier.skip_frames(), Ordering::Relaxed);
        self.shared.stats.reset();
        debug!(?tier, successes, "adaptation window closed");
    }
}

fn worker_main(mut worker: ScanWorker<SystemClock>) -> Box<dyn SymbolDecoder> {
    debug!("scan worker started");
    while !worker.shared.stop.load(Ordering::SeqCst) {
        worker.run_cycle();
    }
    debug!("scan worker exiting");
    worker.into_decoder()
}

/// Owned handle to a running scanning engine
///
/// Construction spawns the worker thread; [`Scanner::shutdown`] (also run on
/// drop) tears it down in order: join the worker, close the capture source,
/// release the decoder.
pub struct Scanner {
    shared: Arc<Shared>,
    source: Mutex<Box<dyn FrameSource>>,
    worker: Option<JoinHandle<Box<dyn SymbolDecoder>>>,
}

impl Scanner {
    /// Open the engine over a capture source and a decoder capability
    ///
    /// This is the only fatal failure point of the scanning feature: callers
    /// that get an error here disable scanning and carry on.
    pub fn open(
        source: Box<dyn FrameSource>,
        decoder: Box<dyn SymbolDecoder>,
    ) -> ScannerResult<Self> {
        let config = *source.config();
        let shared = Arc::new(Shared::new());

        let worker = ScanWorker::new(
            Arc::clone(&shared),
            decoder,
            config.width,
            config.height,
            SystemClock,
        );
        let handle = thread::Builder::new()
            .name("qr-scan".into())
            .spawn(move || worker_main(worker))
            .map_err(|e| ScanError::Other(format!("failed to spawn scan worker: {}", e)))?;

        info!(
            width = config.width,
            height = config.height,
            "scanning engine started"
        );

        Ok(Self {
            shared,
            source: Mutex::new(source),
            worker: Some(handle),
        })
    }

    /// Start capture
    pub fn start_scanning(&self) -> Result<(), CaptureError> {
        self.source.lock().unwrap().start()
    }

    /// Stop capture and drop any frame still waiting for the worker
    pub fn stop_scanning(&self) -> Result<(), CaptureError> {
        let result = self.source.lock().unwrap().stop();
        self.shared.slot.clear();
        result
    }

    /// Render-time frame fetch
    ///
    /// Reads the next frame for preview drawing and hands a copy to the scan
    /// worker through the mailbox. `Ok(None)` means no new frame yet.
    pub fn fetch_frame(&self) -> Result<Option<RawFrame>, CaptureError> {
        let frame = self.source.lock().unwrap().read_frame()?;
        if let Some(ref frame) = frame {
            self.shared.slot.publish(frame.clone());
        }
        Ok(frame)
    }

    /// Last accepted payload and whether it is unacknowledged
    pub fn last_result(&self) -> (Vec<u8>, bool) {
        self.shared.store.peek()
    }

    /// Mark the pending result consumed; the payload stays retrievable
    pub fn acknowledge_result(&self) {
        self.shared.store.acknowledge();
    }

    /// Current adaptation-window counters as (attempts, successes)
    pub fn stats(&self) -> (u32, u32) {
        self.shared.stats.snapshot()
    }

    /// Set the inter-cycle scan delay, clamped to the supported range
    pub fn set_scan_delay(&self, delay_ms: u32) {
        let clamped = delay_ms.clamp(MIN_SCAN_DELAY_MS, MAX_SCAN_DELAY_MS);
        self.shared.scan_delay_ms.store(clamped, Ordering::Relaxed);
    }

    /// Current inter-cycle scan delay in milliseconds
    pub fn scan_delay(&self) -> u32 {
        self.shared.scan_delay_ms.load(Ordering::Relaxed)
    }

    /// Clear result, stats, pending frame and throttle state for a fresh
    /// scanning session
    pub fn reset(&self) {
        self.shared.store.reset();
        self.shared.stats.reset();
        self.shared.slot.clear();
        self.shared
            .scan_delay_ms
            .store(DEFAULT_SCAN_DELAY_MS, Ordering::Relaxed);
        self.shared.skip_frames.store(0, Ordering::Relaxed);
        debug!("scanner reset");
    }

    /// Whether the worker thread is still alive
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Tear down the engine: join the worker, close the capture source,
    /// then release the decoder
    pub fn shutdown(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        self.shared.stop.store(true, Ordering::SeqCst);
        let decoder = match handle.join() {
            Ok(decoder) => Some(decoder),
            Err(_) => {
                warn!("scan worker panicked");
                None
            }
        };
        if let Err(e) = self.source.lock().unwrap().close() {
            warn!(error = %e, "failed to close capture source");
        }
        drop(decoder);
        info!("scanning engine stopped");
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
