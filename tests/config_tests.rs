// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use qr_scanner::ScannerConfig;

#[test]
fn test_config_default() {
    let config = ScannerConfig::default();

    assert_eq!(config.width, 640);
    assert_eq!(config.height, 360);
    assert_eq!(config.framerate, 30);
    assert_eq!(config.scan_delay_ms, 50);
}

#[test]
fn test_config_capture_settings() {
    let config = ScannerConfig::default();
    let capture = config.capture();

    assert_eq!(capture.width, config.width);
    assert_eq!(capture.height, config.height);
    assert_eq!(capture.framerate, config.framerate);
}

#[test]
fn test_config_json_roundtrip() {
    let config = ScannerConfig {
        width: 1280,
        height: 720,
        framerate: 60,
        scan_delay_ms: 33,
    };

    let json = serde_json::to_string(&config).expect("config should serialize");
    let restored: ScannerConfig = serde_json::from_str(&json).expect("config should deserialize");
    assert_eq!(restored, config);
}
