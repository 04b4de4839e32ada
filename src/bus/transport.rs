// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Mutex-guarded bus transport shared by both polling loops
//!
//! The bus is one physical resource accessed from two concurrent tasks, so
//! every transaction goes through a `tokio::sync::Mutex`. The lock is held
//! across all block reads of one frame — releasing it between blocks would
//! let the other loop's transaction land mid-frame and corrupt the decode.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time;

use crate::bus::{BusDriver, BusError};
use crate::config::bus::BusConfig;
use crate::protocol::{FrameAccumulator, FrameError};

/// Shared transport over one bus endpoint.
///
/// Cheap to clone; all clones serialize their transactions through the same
/// mutex. Each transaction carries a timeout so a wedged bus surfaces as
/// [`BusError::Timeout`] instead of stalling the owning loop. For the
/// blocking native driver the timeout is best-effort (the kernel ioctl has
/// its own bounds); for async drivers it is enforced here.
#[derive(Clone)]
pub struct BusTransport {
    driver: Arc<Mutex<Box<dyn BusDriver>>>,
    block_size: usize,
    max_frame_bytes: usize,
    timeout_ms: u64,
}

impl BusTransport {
    /// Wrap a driver with the endpoint geometry from the configuration.
    pub fn new(driver: Box<dyn BusDriver>, config: &BusConfig) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
            block_size: config.block_size,
            max_frame_bytes: config.max_frame_bytes,
            timeout_ms: config.timeout_ms,
        }
    }

    /// Read one complete frame from the bus.
    ///
    /// Holds the bus lock for the whole frame, reading blocks until the
    /// decoder sees the sentinel or the accumulated-byte bound trips.
    pub async fn read_frame(&self) -> Result<String, FrameError> {
        let mut driver = self.driver.lock().await;
        let mut accumulator = FrameAccumulator::new(self.max_frame_bytes);
        loop {
            let block = time::timeout(
                Duration::from_millis(self.timeout_ms),
                driver.read_block(self.block_size),
            )
            .await
            .map_err(|_| BusError::Timeout {
                timeout_ms: self.timeout_ms,
            })??;

            if let Some(payload) = accumulator.push_block(&block)? {
                return Ok(payload);
            }
        }
    }

    /// Write one frame to the bus in a single transaction.
    ///
    /// Outbound frames must fit into one block; the peer firmware reads
    /// exactly one block transfer per frame.
    pub async fn write_frame(&self, frame: &[u8]) -> Result<(), FrameError> {
        if frame.len() > self.block_size {
            return Err(FrameError::FrameTooLong {
                len: frame.len(),
                block_size: self.block_size,
            });
        }
        let mut driver = self.driver.lock().await;
        time::timeout(
            Duration::from_millis(self.timeout_ms),
            driver.write_block(frame),
        )
        .await
        .map_err(|_| BusError::Timeout {
            timeout_ms: self.timeout_ms,
        })??;
        Ok(())
    }

    /// Probe the peer once; used for the startup health check.
    pub async fn probe_peer(&self) -> Result<bool, BusError> {
        let mut driver = self.driver.lock().await;
        driver.peer_present().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::drivers::mock::MockBusDriver;
    use crate::config::bus::BusConfig;
    use async_trait::async_trait;

    /// Driver simulating a wedged bus: every transaction pends far past any
    /// reasonable timeout.
    struct StalledBusDriver;

    #[async_trait]
    impl BusDriver for StalledBusDriver {
        async fn read_block(&mut self, _len: usize) -> Result<Vec<u8>, BusError> {
            time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }

        async fn write_block(&mut self, _data: &[u8]) -> Result<(), BusError> {
            time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn peer_present(&mut self) -> Result<bool, BusError> {
            Ok(true)
        }
    }

    fn test_config() -> BusConfig {
        BusConfig {
            driver: crate::config::bus::BusDriverKind::Mock,
            device: "mock".to_string(),
            peer_address: 0x08,
            block_size: 20,
            timeout_ms: 1000,
            max_frame_bytes: 256,
        }
    }

    #[tokio::test]
    async fn reads_a_frame_spanning_blocks() {
        let driver = MockBusDriver::new();
        let handle = driver.handle();
        // 23-byte frame, so the sentinel lands in the second 20-byte block
        handle.queue_frame(b"12.345678901234,56.789#", 20);

        let transport = BusTransport::new(Box::new(driver), &test_config());
        let payload = transport.read_frame().await.unwrap();
        assert_eq!(payload, "12.345678901234,56.789");
    }

    #[tokio::test]
    async fn unterminated_stream_yields_no_terminator() {
        let driver = MockBusDriver::new();
        let handle = driver.handle();
        for _ in 0..20 {
            handle.queue_block(vec![b'x'; 20]);
        }

        let transport = BusTransport::new(Box::new(driver), &test_config());
        let err = transport.read_frame().await.unwrap_err();
        assert!(matches!(err, FrameError::NoTerminator { max_bytes: 256 }));
    }

    #[tokio::test]
    async fn bus_failure_propagates_from_read() {
        let driver = MockBusDriver::new();
        let transport = BusTransport::new(Box::new(driver), &test_config());
        let err = transport.read_frame().await.unwrap_err();
        assert!(matches!(err, FrameError::Bus(BusError::Exhausted)));
    }

    #[tokio::test]
    async fn oversized_outbound_frame_is_rejected() {
        let driver = MockBusDriver::new();
        let handle = driver.handle();
        let transport = BusTransport::new(Box::new(driver), &test_config());

        let frame = vec![b'a'; 21];
        let err = transport.write_frame(&frame).await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::FrameTooLong {
                len: 21,
                block_size: 20
            }
        ));
        assert!(handle.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn wedged_read_surfaces_as_timeout() {
        let transport = BusTransport::new(Box::new(StalledBusDriver), &test_config());
        let err = transport.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::Bus(BusError::Timeout { timeout_ms: 1000 })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn wedged_write_surfaces_as_timeout() {
        let transport = BusTransport::new(Box::new(StalledBusDriver), &test_config());
        let err = transport.write_frame(b"bathroom_main,1.0#").await.unwrap_err();
        assert!(matches!(err, FrameError::Bus(BusError::Timeout { .. })));
    }

    #[tokio::test]
    async fn write_goes_out_as_one_transaction() {
        let driver = MockBusDriver::new();
        let handle = driver.handle();
        let transport = BusTransport::new(Box::new(driver), &test_config());

        transport.write_frame(b"bathroom_main,1.0#").await.unwrap();
        assert_eq!(handle.writes(), vec![b"bathroom_main,1.0#".to_vec()]);
    }
}
