// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Uplink loop configuration (bus to backend)

use serde::{Deserialize, Serialize};

/// Configuration for the uplink polling loop.
///
/// Each uplink frame carries two comma-separated fields; the two sensor type
/// names below decide which backend series each field is forwarded to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkConfig {
    /// Flag to enable or disable the uplink loop.
    ///
    /// Disabled by default so a freshly generated configuration is valid
    /// before an API key has been set.
    #[serde(default)]
    pub enabled: bool,

    /// Delay between uplink iterations in seconds.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Sensor type name the first frame field is forwarded as.
    #[serde(default = "default_temperature_sensor")]
    pub temperature_sensor: String,

    /// Sensor type name the second frame field is forwarded as.
    #[serde(default = "default_humidity_sensor")]
    pub humidity_sensor: String,
}

fn default_interval_seconds() -> u64 {
    300
}
fn default_temperature_sensor() -> String {
    "temperature_msa_room".to_string()
}
fn default_humidity_sensor() -> String {
    "humidity_msa_room".to_string()
}

impl Default for UplinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_interval_seconds(),
            temperature_sensor: default_temperature_sensor(),
            humidity_sensor: default_humidity_sensor(),
        }
    }
}
