// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! # rust-sensorbridge
//!
//! Bidirectional bridge between a microcontroller on an I2C bus and a REST
//! sensor backend.
//!
//! The microcontroller exposes sensor readings as short sentinel-terminated
//! ASCII frames read over block transactions; the backend stores readings
//! behind an API-keyed HTTP interface. This crate runs two independent
//! polling loops in one process:
//!
//! - **Uplink**: reads a `temperature,humidity#` frame from the bus and
//!   forwards each field to the backend.
//! - **Downlink**: fetches the latest reading of a configured sensor type
//!   from the backend and writes it to the bus as a frame.
//!
//! ## Module overview
//!
//! - [`protocol`]: frame encoding, bounded accumulation, field splitting
//! - [`bus`]: bus drivers (native Linux I2C and mock), shared transport
//! - [`backend`]: HTTP client for the backend's sensor endpoints
//! - [`bridge`]: the uplink and downlink polling loops
//! - [`config`]: YAML configuration with JSON Schema validation
//! - [`daemon`]: task lifecycle, graceful shutdown, heartbeat

pub mod backend;
pub mod bridge;
pub mod bus;
pub mod config;
pub mod daemon;
pub mod protocol;

pub use config::Config;
