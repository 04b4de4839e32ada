// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Bus transport for the microcontroller peer
//!
//! This module provides the hardware abstraction for the shared sensor bus:
//! - the [`BusDriver`] trait with native (Linux `/dev/i2c-*`) and mock drivers
//! - the [`BusTransport`] wrapper that serializes transactions behind a
//!   mutex and applies a per-transaction timeout
//!
//! The bus endpoint (device, peer address, block size) is fixed for the
//! lifetime of the process; retry policy is the caller's responsibility.

pub mod drivers;
pub mod transport;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::bus::{BusConfig, BusDriverKind};

pub use transport::BusTransport;

/// Transport-level bus failures
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus device could not be opened.
    #[error("failed to open bus device {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A single transaction failed. Partial transfers are not a defined
    /// outcome; the driver surfaces failure atomically.
    #[error("bus {operation} at address 0x{address:02x} failed: {source}")]
    Transaction {
        operation: &'static str,
        address: u8,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A transaction did not complete within the configured timeout.
    #[error("bus transaction timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The mock driver ran out of scripted blocks.
    #[error("mock bus has no more scripted blocks")]
    Exhausted,
}

/// Bus driver trait for hardware abstraction
///
/// A driver is bound to one peer endpoint at construction time. Each method
/// performs exactly one transaction which either fully succeeds or fails
/// with a [`BusError`]; no retry logic lives at this layer.
#[async_trait]
pub trait BusDriver: Send {
    /// Read one block of `len` bytes from the peer.
    async fn read_block(&mut self, len: usize) -> Result<Vec<u8>, BusError>;

    /// Write one block of bytes to the peer in a single transaction.
    async fn write_block(&mut self, data: &[u8]) -> Result<(), BusError>;

    /// Check whether the peer responds on the bus.
    async fn peer_present(&mut self) -> Result<bool, BusError>;
}

/// Create the bus driver selected by the configuration.
pub fn create_bus_driver(config: &BusConfig) -> Result<Box<dyn BusDriver>, BusError> {
    match config.driver {
        BusDriverKind::Native => Ok(Box::new(drivers::native::NativeI2cDriver::new(
            &config.device,
            config.peer_address,
        )?)),
        // A configured (rather than test-constructed) mock behaves like a
        // peer that keeps reporting one fixed reading.
        BusDriverKind::Mock => Ok(Box::new(drivers::mock::MockBusDriver::with_repeating_frame(
            b"21.5,40.0#",
            config.block_size,
        ))),
    }
}
