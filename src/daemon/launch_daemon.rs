// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! # Daemon Management Module
//!
//! This module provides functionality for running and managing the bridge's
//! background tasks. It handles the lifecycle of:
//!
//! - The uplink polling loop (bus to backend)
//! - The downlink polling loop (backend to bus)
//! - System health monitoring (heartbeat)
//!
//! Each service runs as an independent Tokio task; the daemon structure
//! tracks the task handles and coordinates graceful startup and shutdown
//! through a shared running flag.

use anyhow::Result;
use log::{debug, info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

use crate::backend::BackendClient;
use crate::bridge::{DownlinkDaemon, UplinkDaemon};
use crate::bus::{create_bus_driver, BusTransport};
use crate::config::Config;

/// Daemon task manager coordinating the bridge's background services
///
/// Maintains a collection of asynchronous tasks and a `running` flag shared
/// between them. Each task checks the flag periodically to determine if it
/// should continue or gracefully terminate. The two polling loops share one
/// [`BusTransport`]; its internal mutex is the only synchronization between
/// them.
pub struct Daemon {
    tasks: Vec<JoinHandle<Result<()>>>,
    running: Arc<AtomicBool>,
}

impl Default for Daemon {
    fn default() -> Self {
        Self::new()
    }
}

impl Daemon {
    /// Create a new daemon instance with an empty task list and the running
    /// flag set to `true`.
    pub fn new() -> Self {
        Daemon {
            tasks: Vec::new(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Launch all configured tasks based on configuration
    ///
    /// Opens the bus, probes the peer once (a silent peer is reported but
    /// not fatal — it may simply be rebooting), and starts only the loops
    /// enabled in the configuration, plus the heartbeat monitor.
    ///
    /// # Errors
    ///
    /// Fails if the bus device cannot be opened or the HTTP client cannot
    /// be constructed; per-iteration errors inside the loops never
    /// propagate here.
    pub async fn launch(&mut self, config: &Config) -> Result<()> {
        if !config.uplink.enabled && !config.downlink.enabled {
            warn!("Neither uplink nor downlink is enabled; only the heartbeat will run");
        }

        let driver = create_bus_driver(&config.bus)?;
        let transport = BusTransport::new(driver, &config.bus);

        match transport.probe_peer().await {
            Ok(true) => info!(
                "Bus peer responding at 0x{:02x} on {}",
                config.bus.peer_address, config.bus.device
            ),
            Ok(false) => warn!(
                "No response from bus peer at 0x{:02x} on {}",
                config.bus.peer_address, config.bus.device
            ),
            Err(e) => warn!("Bus peer probe failed: {}", e),
        }

        let client = BackendClient::new(&config.backend)?;

        if config.uplink.enabled {
            self.start_uplink(UplinkDaemon::new(
                transport.clone(),
                client.clone(),
                config.uplink.clone(),
            ));
        }

        if config.downlink.enabled {
            self.start_downlink(DownlinkDaemon::new(
                transport.clone(),
                client.clone(),
                config.downlink.clone(),
            ));
        }

        // Start heartbeat task for monitoring
        self.start_heartbeat();

        Ok(())
    }

    /// Start the uplink polling loop as a background task
    fn start_uplink(&mut self, daemon: UplinkDaemon) {
        info!("Starting uplink task");
        let running = self.running.clone();
        let task = tokio::spawn(async move {
            daemon.run(running).await;
            Ok(())
        });
        self.tasks.push(task);
    }

    /// Start the downlink polling loop as a background task
    fn start_downlink(&mut self, daemon: DownlinkDaemon) {
        info!("Starting downlink task");
        let running = self.running.clone();
        let task = tokio::spawn(async move {
            daemon.run(running).await;
            Ok(())
        });
        self.tasks.push(task);
    }

    /// Start a heartbeat task that logs system status periodically
    ///
    /// Emits a heartbeat log message every 60 seconds until the daemon's
    /// running flag is cleared; an external monitor can watch for these to
    /// detect a stalled process.
    fn start_heartbeat(&mut self) {
        info!("Starting heartbeat monitor");

        let running = self.running.clone();
        let task = tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                debug!("Daemon heartbeat: running");
                time::sleep(Duration::from_secs(60)).await;
            }
            Ok(())
        });
        self.tasks.push(task);
    }

    /// Signal all tasks to stop at their next flag check.
    pub fn shutdown(&self) {
        info!("Shutting down daemon tasks");
        self.running.store(false, Ordering::SeqCst);
    }

    /// Wait for all tasks to complete.
    pub async fn join(&mut self) -> Result<()> {
        for task in self.tasks.drain(..) {
            task.await??;
        }
        Ok(())
    }
}
