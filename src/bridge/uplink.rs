// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Uplink loop: bus to backend
//!
//! Each iteration reads one frame from the bus, splits it into its two
//! fields (temperature and humidity by convention), and forwards each field
//! to the backend as an independent POST. Delivery is at-most-once and
//! best-effort: a failed send is logged and dropped, never buffered or
//! retried, and never stops the other field or the next iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::backend::BackendClient;
use crate::bus::BusTransport;
use crate::config::uplink::UplinkConfig;
use crate::protocol::split_fields;

/// The bus-to-backend polling daemon
pub struct UplinkDaemon {
    transport: BusTransport,
    client: BackendClient,
    config: UplinkConfig,
}

impl UplinkDaemon {
    /// Create an uplink daemon over an explicitly passed transport and client.
    pub fn new(transport: BusTransport, client: BackendClient, config: UplinkConfig) -> Self {
        Self {
            transport,
            client,
            config,
        }
    }

    /// Run the loop until the running flag is cleared.
    pub async fn run(&self, running: Arc<AtomicBool>) {
        info!(
            "Uplink loop started (interval: {} s)",
            self.config.interval_seconds
        );
        while running.load(Ordering::SeqCst) {
            self.run_once().await;
            super::sleep_interval(self.config.interval_seconds, &running).await;
        }
        info!("Uplink loop stopped");
    }

    /// Execute one iteration: read, parse, forward.
    ///
    /// Every failure is logged and ends the iteration; nothing is fatal to
    /// the loop.
    pub async fn run_once(&self) {
        let payload = match self.transport.read_frame().await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Uplink: failed to read frame from bus: {}", e);
                return;
            }
        };
        debug!("Uplink: received frame payload {:?}", payload);

        let (temperature, humidity) = match split_fields(&payload) {
            Ok(fields) => fields,
            Err(e) => {
                // Frame dropped, no forward attempted.
                warn!("Uplink: {}", e);
                return;
            }
        };

        // Two independent forward attempts; one failing never cancels the other.
        for (sensor_type, value) in [
            (self.config.temperature_sensor.as_str(), &temperature),
            (self.config.humidity_sensor.as_str(), &humidity),
        ] {
            match self.client.push_reading(sensor_type, value).await {
                Ok(()) => info!("Uplink: forwarded {}={}", sensor_type, value),
                Err(e) => error!("Uplink: failed to forward {}={}: {}", sensor_type, value, e),
            }
        }
    }
}
