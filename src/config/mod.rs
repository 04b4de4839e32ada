// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Configuration management for the sensor bridge
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file and
//! validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as a nested structure with sections:
//! - `bus`: the shared I2C bus endpoint (driver, device, peer address, geometry)
//! - `backend`: the REST backend (base URL, API key, request timeout)
//! - `uplink`: the bus-to-backend polling loop
//! - `downlink`: the backend-to-bus polling loop
//!
//! ## Usage
//!
//! ```no_run
//! use rust_sensorbridge::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("http://192.168.1.10:5000".to_string()), // Backend base URL
//!     Some("secret".to_string()),                   // API key
//!     None,                                         // Bus device
//!     Some(true),                                   // Uplink enabled
//!     None,                                         // Downlink enabled
//!     Some(60),                                     // Uplink interval
//!     None,                                         // Downlink interval
//! );
//!
//! println!("Backend: {}", config.backend.base_url);
//! ```

pub mod backend;
pub mod bus;
pub mod downlink;
pub mod uplink;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

// Re-export all types for public API
pub use backend::BackendConfig;
pub use bus::{BusConfig, BusDriverKind};
pub use downlink::DownlinkConfig;
pub use uplink::UplinkConfig;
pub use utils::output_config_schema;

/// Root configuration structure for the sensor bridge.
///
/// Deserialized from and serialized to YAML with serde, and validated
/// against a JSON schema before deserialization so malformed files produce
/// a clear diagnostic instead of a serde type error. Each section falls
/// back to its defaults when absent from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The shared I2C bus endpoint used by both polling loops.
    #[serde(default)]
    pub bus: BusConfig,

    /// REST backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Uplink loop settings (bus to backend).
    #[serde(default)]
    pub uplink: UplinkConfig,

    /// Downlink loop settings (backend to bus).
    #[serde(default)]
    pub downlink: DownlinkConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            backend: BackendConfig::default(),
            uplink: UplinkConfig::default(),
            downlink: DownlinkConfig::default(),
        }
    }
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Creating sample configuration file at {:?}", sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        let sample_config = Self::default();
        sample_config
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// If the file does not exist, a default configuration is written to the
    /// given path and returned. Otherwise the YAML content is validated
    /// against the embedded JSON schema and against additional specific
    /// rules; on failure a `*.sample.yaml` file with defaults is generated
    /// next to it and an error is returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // First step: convert YAML to a generic Value
        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // Convert to JSON Value for validation
        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        // Load and validate with the schema
        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value =
            serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        // Now that YAML has been validated, deserialize to Config
        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_yml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                match Self::create_sample_config(path) {
                    Ok(_) => debug!("Successfully created sample config"),
                    Err(e) => error!("Failed to create sample config: {}", e),
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        // Perform additional specific validations
        if let Err(err) = utils::validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values that are explicitly provided override the existing
    /// configuration.
    ///
    /// # Parameters
    ///
    /// * `base_url` - Backend base URL
    /// * `api_key` - API key for the `X-API-Key` header
    /// * `bus_device` - I2C character device path
    /// * `uplink_enabled` - Enable/disable the uplink loop
    /// * `downlink_enabled` - Enable/disable the downlink loop
    /// * `uplink_interval` - Uplink iteration interval in seconds
    /// * `downlink_interval` - Downlink iteration interval in seconds
    pub fn apply_args(
        &mut self,
        base_url: Option<String>,
        api_key: Option<String>,
        bus_device: Option<String>,
        uplink_enabled: Option<bool>,
        downlink_enabled: Option<bool>,
        uplink_interval: Option<u64>,
        downlink_interval: Option<u64>,
    ) {
        if let Some(base_url) = base_url {
            debug!("Overriding backend base URL from command line: {}", base_url);
            self.backend.base_url = base_url;
        }

        if let Some(api_key) = api_key {
            debug!("Overriding API key from command line");
            self.backend.api_key = api_key;
        }

        if let Some(device) = bus_device {
            debug!("Overriding bus device from command line: {}", device);
            self.bus.device = device;
        }

        if let Some(enabled) = uplink_enabled {
            debug!("Overriding uplink enabled from command line: {}", enabled);
            self.uplink.enabled = enabled;
        }

        if let Some(enabled) = downlink_enabled {
            debug!("Overriding downlink enabled from command line: {}", enabled);
            self.downlink.enabled = enabled;
        }

        if let Some(interval) = uplink_interval {
            debug!("Overriding uplink interval from command line: {}", interval);
            self.uplink.interval_seconds = interval;
        }

        if let Some(interval) = downlink_interval {
            debug!(
                "Overriding downlink interval from command line: {}",
                interval
            );
            self.downlink.interval_seconds = interval;
        }
    }
}
