// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Native I2C driver for Linux hardware
//!
//! Communicates with the microcontroller peer through a `/dev/i2c-*`
//! character device using SMBus block transfers, with command byte 0 —
//! the convention the peer firmware expects. SMBus caps block transfers
//! at 32 bytes, which the configuration schema enforces upstream.

use async_trait::async_trait;
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;

use crate::bus::{BusDriver, BusError};

/// SMBus command byte used for all block transfers.
const BLOCK_COMMAND: u8 = 0;

/// Native Linux I2C driver bound to a fixed peer address
pub struct NativeI2cDriver {
    device: LinuxI2CDevice,
    address: u8,
}

impl NativeI2cDriver {
    /// Open the I2C character device and bind the peer address.
    pub fn new(device_path: &str, address: u8) -> Result<Self, BusError> {
        let device =
            LinuxI2CDevice::new(device_path, u16::from(address)).map_err(|e| BusError::Open {
                device: device_path.to_string(),
                source: Box::new(e),
            })?;
        Ok(Self { device, address })
    }
}

#[async_trait]
impl BusDriver for NativeI2cDriver {
    async fn read_block(&mut self, len: usize) -> Result<Vec<u8>, BusError> {
        self.device
            .smbus_read_i2c_block_data(BLOCK_COMMAND, len as u8)
            .map_err(|e| BusError::Transaction {
                operation: "block read",
                address: self.address,
                source: Box::new(e),
            })
    }

    async fn write_block(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.device
            .smbus_write_i2c_block_data(BLOCK_COMMAND, data)
            .map_err(|e| BusError::Transaction {
                operation: "block write",
                address: self.address,
                source: Box::new(e),
            })
    }

    async fn peer_present(&mut self) -> Result<bool, BusError> {
        // A one-byte read is the cheapest probe; a missing peer NAKs it.
        Ok(self.device.smbus_read_byte().is_ok())
    }
}
