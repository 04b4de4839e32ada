// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Integration tests for configuration loading and validation
//!
//! Exercises the full `Config::from_file` flow against real files in a
//! temporary directory: default generation, YAML round-trips, schema and
//! rule violations, and the sample file produced on failure.

use std::fs;

use tempfile::tempdir;

use rust_sensorbridge::config::{BusDriverKind, Config};

#[test]
fn test_missing_file_creates_and_returns_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let config = Config::from_file(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.bus.peer_address, 0x08);
    assert_eq!(config.bus.block_size, 20);
    assert_eq!(config.uplink.interval_seconds, 300);
    assert_eq!(config.downlink.interval_seconds, 10);
    assert!(!config.uplink.enabled);
    assert!(!config.downlink.enabled);
}

#[test]
fn test_saved_config_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.bus.driver = BusDriverKind::Mock;
    config.backend.base_url = "http://backend.local:5000".to_string();
    config.backend.api_key = "round-trip-key".to_string();
    config.uplink.enabled = true;
    config.uplink.interval_seconds = 60;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert!(matches!(loaded.bus.driver, BusDriverKind::Mock));
    assert_eq!(loaded.backend.base_url, "http://backend.local:5000");
    assert_eq!(loaded.backend.api_key, "round-trip-key");
    assert!(loaded.uplink.enabled);
    assert_eq!(loaded.uplink.interval_seconds, 60);
    // Untouched sections keep their defaults.
    assert_eq!(loaded.downlink.sensor_type, "bathroom_main");
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "backend:\n  base_url: http://10.0.0.2:5000\n  api_key: abc\n",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.backend.base_url, "http://10.0.0.2:5000");
    assert_eq!(config.bus.device, "/dev/i2c-1");
    assert_eq!(config.bus.max_frame_bytes, 256);
}

#[test]
fn test_schema_violation_fails_and_writes_sample() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    // peer_address above the 7-bit address range is rejected by the schema.
    fs::write(&path, "bus:\n  peer_address: 200\n").unwrap();

    let result = Config::from_file(&path);
    assert!(result.is_err());
    assert!(dir.path().join("config.sample.yaml").exists());
}

#[test]
fn test_unknown_section_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "buss:\n  peer_address: 8\n").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_enabled_loop_without_api_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "uplink:\n  enabled: true\n").unwrap();

    let result = Config::from_file(&path);
    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("api_key"));
}

#[test]
fn test_sensor_type_with_frame_delimiter_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "backend:\n  api_key: abc\ndownlink:\n  enabled: true\n  sensor_type: \"bad,name\"\n",
    )
    .unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_invalid_base_url_scheme_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "backend:\n  base_url: \"ftp://backend:21\"\n").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_apply_args_overrides_only_provided_values() {
    let mut config = Config::default();
    config.apply_args(
        Some("http://192.168.1.10:5000".to_string()),
        Some("cli-key".to_string()),
        None,
        Some(true),
        None,
        Some(120),
        None,
    );

    assert_eq!(config.backend.base_url, "http://192.168.1.10:5000");
    assert_eq!(config.backend.api_key, "cli-key");
    assert!(config.uplink.enabled);
    assert_eq!(config.uplink.interval_seconds, 120);
    // Values not provided on the command line stay untouched.
    assert_eq!(config.bus.device, "/dev/i2c-1");
    assert!(!config.downlink.enabled);
    assert_eq!(config.downlink.interval_seconds, 10);
}
