// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! The two polling loops bridging the bus and the backend
//!
//! Uplink (bus to backend) and downlink (backend to bus) are independent,
//! non-interacting loops. They share the bus transport — whose mutex is the
//! only synchronization between them — and nothing else. Every iteration is
//! stateless: no frame or reading survives into the next one, and every
//! error kind is non-fatal to its owning loop.

pub mod downlink;
pub mod uplink;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time;

pub use downlink::DownlinkDaemon;
pub use uplink::UplinkDaemon;

/// Sleep for an iteration interval while staying responsive to shutdown.
///
/// Intervals run up to five minutes; sleeping in one-second slices lets a
/// loop notice the cleared running flag without waiting out the interval.
pub(crate) async fn sleep_interval(seconds: u64, running: &AtomicBool) {
    let mut remaining = seconds;
    while remaining > 0 && running.load(Ordering::SeqCst) {
        time::sleep(Duration::from_secs(1)).await;
        remaining -= 1;
    }
}
