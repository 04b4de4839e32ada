// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Downlink loop: backend to bus
//!
//! Each iteration polls the backend for the most recent value of one
//! configured sensor type and mirrors it to the microcontroller as a frame.
//! A failed query, an empty result, or a non-numeric value all skip the
//! iteration the same way: no frame is written.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info, warn};

use crate::backend::BackendClient;
use crate::bus::BusTransport;
use crate::config::downlink::DownlinkConfig;
use crate::protocol::{encode_numeric_frame, format_value};

/// The backend-to-bus polling daemon
pub struct DownlinkDaemon {
    transport: BusTransport,
    client: BackendClient,
    config: DownlinkConfig,
}

impl DownlinkDaemon {
    /// Create a downlink daemon over an explicitly passed transport and client.
    pub fn new(transport: BusTransport, client: BackendClient, config: DownlinkConfig) -> Self {
        Self {
            transport,
            client,
            config,
        }
    }

    /// Run the loop until the running flag is cleared.
    pub async fn run(&self, running: Arc<AtomicBool>) {
        info!(
            "Downlink loop started for {:?} (interval: {} s)",
            self.config.sensor_type, self.config.interval_seconds
        );
        while running.load(Ordering::SeqCst) {
            self.run_once().await;
            super::sleep_interval(self.config.interval_seconds, &running).await;
        }
        info!("Downlink loop stopped");
    }

    /// Execute one iteration: query, extract, encode, write.
    pub async fn run_once(&self) {
        let reading = match self.client.latest_reading(&self.config.sensor_type).await {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Downlink: skipping iteration: {}", e);
                return;
            }
        };

        // A non-numeric value is treated like a failed query.
        let value = match reading.numeric_value() {
            Ok(value) => value,
            Err(e) => {
                warn!("Downlink: skipping iteration: {}", e);
                return;
            }
        };

        let frame = encode_numeric_frame(&self.config.sensor_type, value);
        match self.transport.write_frame(&frame).await {
            Ok(()) => info!(
                "Downlink: wrote {}={} to bus",
                self.config.sensor_type,
                format_value(value)
            ),
            Err(e) => error!(
                "Downlink: failed to write {} frame to bus: {}",
                self.config.sensor_type, e
            ),
        }
    }
}
