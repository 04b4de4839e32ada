// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! HTTP client for the sensor backend

use anyhow::Result;
use log::debug;
use std::time::Duration;

use crate::backend::{BackendError, SensorReading};
use crate::config::backend::BackendConfig;

/// Header carrying the backend API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Client for the backend's sensor endpoints.
///
/// Holds one `reqwest::Client` with the configured request timeout; both
/// polling loops construct their requests through it.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    /// Build a client from the backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Push one reading to the backend (`POST /sensors/add`).
    ///
    /// The value travels as a string, exactly as it appeared on the bus.
    pub async fn push_reading(&self, sensor_type: &str, value: &str) -> Result<(), BackendError> {
        let url = format!("{}/sensors/add", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .form(&[("sensor_type", sensor_type), ("value", value)])
            .send()
            .await
            .map_err(|source| BackendError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(BackendError::Status {
                status: response.status(),
                url,
            });
        }

        debug!("Pushed {}={} to backend", sensor_type, value);
        Ok(())
    }

    /// Fetch the most recent reading for a sensor type
    /// (`GET /sensors/get?sensor_type=..&limit=1`).
    ///
    /// The backend orders results newest first; an empty result set maps to
    /// [`BackendError::NoReadings`].
    pub async fn latest_reading(&self, sensor_type: &str) -> Result<SensorReading, BackendError> {
        let url = format!("{}/sensors/get", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("sensor_type", sensor_type), ("limit", "1")])
            .send()
            .await
            .map_err(|source| BackendError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(BackendError::Status {
                status: response.status(),
                url,
            });
        }

        let readings: Vec<SensorReading> =
            response
                .json()
                .await
                .map_err(|source| BackendError::Request {
                    url: url.clone(),
                    source,
                })?;

        readings
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NoReadings {
                sensor_type: sensor_type.to_string(),
            })
    }
}
