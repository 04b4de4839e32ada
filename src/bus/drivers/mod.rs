// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Bus driver implementations
//!
//! - Native: direct access to Linux I2C hardware via /dev/i2c-*
//! - Mock: scripted in-memory driver for tests and hardware-free runs

pub mod mock;
pub mod native;

pub use mock::{MockBusDriver, MockBusHandle};
pub use native::NativeI2cDriver;
