// SPDX-License-Identifier: GPL-3.0-only

//! Shared result store
//!
//! Holds the last accepted payload and the "new result available" flag.
//! Written only by the scan worker; read by any number of consumers. The
//! payload record lives behind a mutex so a reader always sees length and
//! bytes from the same publish; the scanned flag is set only after the
//! record is fully written.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::debug;

#[derive(Debug, Default)]
struct ScanRecord {
    payload: Vec<u8>,
    accepted_at: Option<Instant>,
}

/// Thread-shared holder for the last accepted payload
#[derive(Debug, Default)]
pub struct ResultStore {
    record: Mutex<ScanRecord>,
    scanned: AtomicBool,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a validated candidate. Returns whether it was accepted.
    ///
    /// A candidate is accepted when the store is empty or its bytes differ
    /// from the stored payload. Re-publishing identical content is a no-op:
    /// the stored bytes stay untouched and the scanned flag is not forced,
    /// so a code left in frame across cycles does not churn consumers.
    pub fn publish(&self, candidate: &[u8]) -> bool {
        let mut record = self.record.lock().unwrap();
        if !record.payload.is_empty() && record.payload == candidate {
            return false;
        }

        record.payload.clear();
        record.payload.extend_from_slice(candidate);
        record.accepted_at = Some(Instant::now());
        drop(record);

        self.scanned.store(true, Ordering::Release);
        debug!(len = candidate.len(), "accepted new payload");
        true
    }

    /// Snapshot of the stored payload and the scanned flag
    pub fn peek(&self) -> (Vec<u8>, bool) {
        let record = self.record.lock().unwrap();
        let payload = record.payload.clone();
        drop(record);
        (payload, self.scanned.load(Ordering::Acquire))
    }

    /// Whether an unacknowledged result is pending
    pub fn is_scanned(&self) -> bool {
        self.scanned.load(Ordering::Acquire)
    }

    /// When the pending payload was accepted, if any
    pub fn accepted_at(&self) -> Option<Instant> {
        self.record.lock().unwrap().accepted_at
    }

    /// Mark the pending result consumed. The payload stays retrievable so a
    /// consumer can replay it after acknowledging.
    pub fn acknowledge(&self) {
        self.scanned.store(false, Ordering::Release);
    }

    /// Clear payload, flag and timestamp for a fresh scanning session
    pub fn reset(&self) {
        let mut record = self.record.lock().unwrap();
        record.payload.clear();
        record.accepted_at = None;
        drop(record);
        self.scanned.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_publish_is_accepted() {
        let store = ResultStore::new();
        assert!(store.publish(b"http://a"));
        let (payload, scanned) = store.peek();
        assert_eq!(payload, b"http://a");
        assert!(scanned);
    }

    #[test]
    fn test_duplicate_publish_is_rejected() {
        let store = ResultStore::new();
        assert!(store.publish(b"http://a"));
        store.acknowledge();

        assert!(!store.publish(b"http://a"));
        let (payload, scanned) = store.peek();
        assert_eq!(payload, b"http://a");
        assert!(!scanned, "duplicate must not force the scanned flag");
    }

    #[test]
    fn test_distinct_payload_overwrites() {
        let store = ResultStore::new();
        store.publish(b"http://a");
        assert!(store.publish(b"http://b"));
        let (payload, scanned) = store.peek();
        assert_eq!(payload, b"http://b");
        assert!(scanned);
    }

    #[test]
    fn test_acknowledge_keeps_payload() {
        let store = ResultStore::new();
        store.publish(b"http://a");
        store.acknowledge();
        let (payload, scanned) = store.peek();
        assert_eq!(payload, b"http://a");
        assert!(!scanned);
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = ResultStore::new();
        store.publish(b"http://a");
        store.reset();
        let (payload, scanned) = store.peek();
        assert!(payload.is_empty());
        assert!(!scanned);
        assert!(store.accepted_at().is_none());
    }

    #[test]
    fn test_republish_after_reset_is_accepted() {
        let store = ResultStore::new();
        store.publish(b"http://a");
        store.reset();
        assert!(store.publish(b"http://a"));
    }
}
