// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! REST backend access
//!
//! The backend is an external collaborator reached over HTTP: readings are
//! pushed with `POST /sensors/add` (form-encoded) and queried with
//! `GET /sensors/get` (JSON array, newest first). Every request carries the
//! `X-API-Key` header and the configured client timeout.

pub mod client;

use serde::Deserialize;
use thiserror::Error;

pub use client::BackendClient;

/// One stored sensor reading as returned by `GET /sensors/get`.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorReading {
    pub sensor_type: String,
    /// Values are stored and transported as strings; numeric interpretation
    /// happens at the consumer via [`SensorReading::numeric_value`].
    pub value: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SensorReading {
    /// Parse the reading's value as a floating-point number.
    pub fn numeric_value(&self) -> Result<f64, BackendError> {
        self.value
            .trim()
            .parse()
            .map_err(|_| BackendError::Value {
                sensor_type: self.sensor_type.clone(),
                value: self.value.clone(),
            })
    }
}

/// Backend request failures
#[derive(Debug, Error)]
pub enum BackendError {
    /// The HTTP request itself failed (timeout, connection refused, bad body).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The backend has no stored readings for the requested sensor type.
    #[error("no stored readings for sensor type {sensor_type:?}")]
    NoReadings { sensor_type: String },

    /// A reading's value could not be parsed as a number.
    #[error("non-numeric value {value:?} in reading for {sensor_type:?}")]
    Value { sensor_type: String, value: String },
}
