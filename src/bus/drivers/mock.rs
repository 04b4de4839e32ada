// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Mock bus driver for tests and hardware-free runs
//!
//! Serves scripted blocks for reads and records every write. State lives
//! behind a shared handle so tests (and the daemon, when configured with
//! the mock driver) can script reads and inspect writes while the boxed
//! driver is owned by the transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::bus::{BusDriver, BusError};

/// Padding byte used to fill a block past the end of a frame, matching the
/// idle-high level of a real bus.
const PAD_BYTE: u8 = 0xFF;

#[derive(Debug, Default)]
struct MockBusState {
    pending_reads: VecDeque<Vec<u8>>,
    writes: Vec<Vec<u8>>,
    /// Frame re-queued whenever the read script runs dry, as (bytes, block size).
    repeating_frame: Option<(Vec<u8>, usize)>,
}

/// Scripted in-memory bus driver
pub struct MockBusDriver {
    state: Arc<Mutex<MockBusState>>,
}

/// Shared handle onto a [`MockBusDriver`]'s state
#[derive(Clone)]
pub struct MockBusHandle {
    state: Arc<Mutex<MockBusState>>,
}

/// Chunk a frame into fixed-size blocks, padding the last one.
fn chunk_frame(frame: &[u8], block_size: usize) -> Vec<Vec<u8>> {
    frame
        .chunks(block_size.max(1))
        .map(|chunk| {
            let mut block = chunk.to_vec();
            block.resize(block_size.max(1), PAD_BYTE);
            block
        })
        .collect()
}

impl MockBusDriver {
    /// Create a driver with an empty read script.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockBusState::default())),
        }
    }

    /// Create a driver that serves `frame` over and over, the way a peer
    /// that continuously reports one reading would. Used for runs without
    /// hardware attached.
    pub fn with_repeating_frame(frame: &[u8], block_size: usize) -> Self {
        let driver = Self::new();
        {
            let mut state = driver.state.lock().expect("mock bus state poisoned");
            state.repeating_frame = Some((frame.to_vec(), block_size));
        }
        driver
    }

    /// Obtain a handle for scripting reads and inspecting writes.
    pub fn handle(&self) -> MockBusHandle {
        MockBusHandle {
            state: self.state.clone(),
        }
    }
}

impl Default for MockBusDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBusHandle {
    /// Queue one raw block to be served by the next read.
    pub fn queue_block(&self, block: Vec<u8>) {
        let mut state = self.state.lock().expect("mock bus state poisoned");
        state.pending_reads.push_back(block);
    }

    /// Queue a whole frame, chunked into `block_size`-byte blocks.
    pub fn queue_frame(&self, frame: &[u8], block_size: usize) {
        let mut state = self.state.lock().expect("mock bus state poisoned");
        for block in chunk_frame(frame, block_size) {
            state.pending_reads.push_back(block);
        }
    }

    /// All blocks written to the bus so far, oldest first.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        let state = self.state.lock().expect("mock bus state poisoned");
        state.writes.clone()
    }
}

#[async_trait]
impl BusDriver for MockBusDriver {
    async fn read_block(&mut self, len: usize) -> Result<Vec<u8>, BusError> {
        let mut state = self.state.lock().expect("mock bus state poisoned");
        if state.pending_reads.is_empty() {
            if let Some((frame, block_size)) = state.repeating_frame.clone() {
                for block in chunk_frame(&frame, block_size) {
                    state.pending_reads.push_back(block);
                }
            }
        }
        let mut block = state.pending_reads.pop_front().ok_or(BusError::Exhausted)?;
        block.resize(len, PAD_BYTE);
        Ok(block)
    }

    async fn write_block(&mut self, data: &[u8]) -> Result<(), BusError> {
        let mut state = self.state.lock().expect("mock bus state poisoned");
        state.writes.push(data.to_vec());
        Ok(())
    }

    async fn peer_present(&mut self) -> Result<bool, BusError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_blocks_are_served_in_order() {
        let mut driver = MockBusDriver::new();
        let handle = driver.handle();
        handle.queue_block(vec![1, 2, 3]);
        handle.queue_block(vec![4, 5, 6]);

        assert_eq!(driver.read_block(3).await.unwrap(), vec![1, 2, 3]);
        assert_eq!(driver.read_block(3).await.unwrap(), vec![4, 5, 6]);
        assert!(matches!(
            driver.read_block(3).await,
            Err(BusError::Exhausted)
        ));
    }

    #[tokio::test]
    async fn repeating_frame_is_rearmed_when_script_runs_dry() {
        let mut driver = MockBusDriver::with_repeating_frame(b"21.5,40.0#", 20);
        let first = driver.read_block(20).await.unwrap();
        let second = driver.read_block(20).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(b"21.5,40.0#"));
        assert_eq!(first.len(), 20);
    }

    #[tokio::test]
    async fn writes_are_recorded() {
        let mut driver = MockBusDriver::new();
        let handle = driver.handle();
        driver.write_block(b"bathroom_main,1.0#").await.unwrap();
        assert_eq!(handle.writes(), vec![b"bathroom_main,1.0#".to_vec()]);
    }
}
