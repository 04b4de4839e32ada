// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Downlink loop configuration (backend to bus)

use serde::{Deserialize, Serialize};

/// Configuration for the downlink polling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownlinkConfig {
    /// Flag to enable or disable the downlink loop.
    #[serde(default)]
    pub enabled: bool,

    /// Delay between downlink iterations in seconds.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Sensor type whose most recent backend value is mirrored to the bus.
    /// Must not contain the frame separator ',' or the sentinel '#'.
    #[serde(default = "default_sensor_type")]
    pub sensor_type: String,
}

fn default_interval_seconds() -> u64 {
    10
}
fn default_sensor_type() -> String {
    "bathroom_main".to_string()
}

impl Default for DownlinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_interval_seconds(),
            sensor_type: default_sensor_type(),
        }
    }
}
