// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! I2C bus endpoint configuration
//!
//! This module defines the structures describing the shared bus endpoint:
//! which driver to use, the character device, the fixed peer address, and
//! the transaction geometry. The endpoint is fixed for the lifetime of the
//! process and shared by both polling loops.

use serde::{Deserialize, Serialize};

/// Configuration for the I2C bus endpoint.
///
/// Both the uplink and the downlink loop perform their transactions against
/// this single endpoint. Block size is capped at 32 bytes, the SMBus block
/// transfer limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Bus driver: "native" for Linux /dev/i2c-* hardware or "mock" for
    /// hardware-free runs.
    #[serde(default)]
    pub driver: BusDriverKind,

    /// I2C character device path (e.g. "/dev/i2c-1"). Ignored by the mock driver.
    #[serde(default = "default_device")]
    pub device: String,

    /// 7-bit I2C address of the microcontroller peer. Must match the address
    /// the peer firmware registers as a slave.
    #[serde(default = "default_peer_address")]
    pub peer_address: u8,

    /// Number of bytes transferred per bus transaction.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Per-transaction timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum accumulated payload bytes before an unterminated frame read is
    /// abandoned with a framing error.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

/// Bus driver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusDriverKind {
    /// Native Linux I2C bus via /dev/i2c-*
    Native,
    /// Scripted in-memory driver for tests and development
    Mock,
}

fn default_device() -> String {
    "/dev/i2c-1".to_string()
}
fn default_peer_address() -> u8 {
    0x08
}
fn default_block_size() -> usize {
    20
}
fn default_timeout_ms() -> u64 {
    1000
}
fn default_max_frame_bytes() -> usize {
    256
}

impl Default for BusDriverKind {
    fn default() -> Self {
        BusDriverKind::Native
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            driver: BusDriverKind::default(),
            device: default_device(),
            peer_address: default_peer_address(),
            block_size: default_block_size(),
            timeout_ms: default_timeout_ms(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}
