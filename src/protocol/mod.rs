// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Wire protocol for the sensor bus
//!
//! Frames are sentinel-terminated ASCII CSV: `"<field>,<field>#"`. The codec
//! is shared by both directions — the uplink loop decodes frames arriving
//! from the microcontroller, the downlink loop encodes frames sent to it.

pub mod frame;

pub use frame::{
    encode_frame, encode_numeric_frame, format_value, split_fields, FrameAccumulator, FrameError,
    FIELD_SEPARATOR, SENTINEL,
};
