// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for scanner operations
//!
//! This module provides command-line functionality for:
//! - Decoding a QR code from a single image
//! - Running the continuous engine over a looping image sequence

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use qr_scanner::constants::capture::FRAME_INTERVAL;
use qr_scanner::constants::scan::MAX_CANDIDATES;
use qr_scanner::{
    FileSource, LumaConverter, RawFrame, RqrrDecoder, ScanQuality, Scanner, ScannerConfig,
    SymbolDecoder, is_acceptable_payload,
};

/// Decode a QR code from a single image file
pub fn scan_image(image: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let rgba = image::open(&image)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|p| RawFrame::pack(p[0], p[1], p[2]))
        .collect();
    let frame = RawFrame::from_pixels(width, height, pixels);

    let mut converter = LumaConverter::new(width, height);
    let bitmap = converter.convert(&frame)?;

    let mut decoder = RqrrDecoder::new();
    let located = decoder.locate(bitmap);
    if located == 0 {
        println!("No QR code found.");
        return Ok(());
    }

    for index in 0..located.min(MAX_CANDIDATES) {
        match decoder.decode(index) {
            Ok(candidate) if is_acceptable_payload(&candidate.payload) => {
                let quality = ScanQuality::classify(candidate.payload.len());
                println!(
                    "Decoded payload ({} bytes, quality {}):",
                    candidate.payload.len(),
                    quality
                );
                println!("{}", String::from_utf8_lossy(&candidate.payload));
                return Ok(());
            }
            Ok(candidate) => {
                println!(
                    "Symbol {} rejected by validation ({} bytes).",
                    index,
                    candidate.payload.len()
                );
            }
            Err(e) => {
                println!("Symbol {} could not be decoded: {}", index, e);
            }
        }
    }

    println!("Located {} symbol(s), none acceptable.", located);
    Ok(())
}

/// Run the continuous engine over a looping sequence of images
pub fn watch(images: Vec<PathBuf>, delay: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ScannerConfig::load();
    let source = FileSource::open(&images, config.capture())?;
    let mut scanner = Scanner::open(Box::new(source), Box::new(RqrrDecoder::new()))?;
    scanner.set_scan_delay(delay.unwrap_or(config.scan_delay_ms));
    scanner.start_scanning()?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || stop_handler.store(true, Ordering::SeqCst))?;

    println!("Scanning... press Ctrl-C to stop.");
    while !stop.load(Ordering::SeqCst) {
        scanner.fetch_frame()?;

        let (payload, scanned) = scanner.last_result();
        if scanned {
            let quality = ScanQuality::classify(payload.len());
            println!("[{}] {}", quality, String::from_utf8_lossy(&payload));
            scanner.acknowledge_result();
        }

        thread::sleep(FRAME_INTERVAL);
    }

    let (attempts, successes) = scanner.stats();
    println!(
        "Stopped. Current window: {} attempts, {} successes.",
        attempts, successes
    );
    scanner.stop_scanning()?;
    scanner.shutdown();
    Ok(())
}
