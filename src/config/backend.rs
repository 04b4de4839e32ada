// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! REST backend configuration
//!
//! Settings for the HTTP backend the bridge talks to: base URL, API key for
//! the `X-API-Key` header, and the fixed client-side request timeout.

use serde::{Deserialize, Serialize};

/// Configuration for the REST backend connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g. "http://localhost:5000"). A trailing
    /// slash is tolerated and stripped when requests are built.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `X-API-Key` header on every request. Must be
    /// non-empty once the uplink or downlink loop is enabled.
    #[serde(default)]
    pub api_key: String,

    /// HTTP request timeout in seconds, applied to every backend call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout_seconds() -> u64 {
    5
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
