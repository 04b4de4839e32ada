// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Configuration utilities
//!
//! Utility functions for working with configuration settings: schema output
//! and validation rules that cannot be expressed in the JSON schema.

use anyhow::{Context, Result};
use log::debug;
use url::Url;

use super::Config;

/// Output the embedded JSON schema to the console.
///
/// Called when the `--show-config-schema` flag is provided on the command
/// line; prints the full configuration schema to stdout, formatted for
/// readability.
///
/// ### Example
///
/// ```bash
/// ./rust_sensorbridge --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema_str = include_str!("../../resources/config.schema.json");

    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Validates the configuration against rules the JSON schema cannot express.
///
/// ### Validation Rules
///
/// - **Backend URL**: must parse as a URL with an `http` or `https` scheme
/// - **API key**: must be non-empty once the uplink or downlink loop is
///   enabled (the backend rejects unauthenticated writes and reads)
/// - **Sensor type names**: must not contain the frame field separator `,`
///   or the sentinel `#`, which would corrupt encoded frames
/// - **Frame bound**: `bus.max_frame_bytes` must cover at least one block,
///   otherwise no frame could ever be decoded
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    let url = Url::parse(&config.backend.base_url).with_context(|| {
        format!(
            "backend.base_url {:?} is not a valid URL",
            config.backend.base_url
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!(
            "backend.base_url must use http or https, got {:?}",
            url.scheme()
        );
    }

    if (config.uplink.enabled || config.downlink.enabled)
        && config.backend.api_key.trim().is_empty()
    {
        anyhow::bail!("backend.api_key must be set when the uplink or downlink loop is enabled");
    }

    for sensor_type in [
        &config.uplink.temperature_sensor,
        &config.uplink.humidity_sensor,
        &config.downlink.sensor_type,
    ] {
        if sensor_type.contains(',') || sensor_type.contains('#') {
            anyhow::bail!("sensor type {:?} must not contain ',' or '#'", sensor_type);
        }
    }

    if config.bus.max_frame_bytes < config.bus.block_size {
        anyhow::bail!(
            "bus.max_frame_bytes ({}) must be at least one block ({})",
            config.bus.max_frame_bytes,
            config.bus.block_size
        );
    }

    Ok(())
}
