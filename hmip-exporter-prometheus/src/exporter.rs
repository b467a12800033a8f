//! Exporter lifecycle around a [`Hub`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hmip_common::Hub;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::engine::MetricsEngine;
use crate::error::ExporterError;

/// Subsystem name under which hub processing failures are reported.
pub const HEALTH_SUBSYSTEM: &str = "HomematicIP Client";

/// Unhealthy subsystems mapped to their error. Empty means healthy.
pub type HealthReport = BTreeMap<String, String>;

/// Health and readiness as seen by the HTTP endpoint.
pub trait HealthCheck: Send + Sync {
    fn health(&self) -> HealthReport;

    /// Whether the initial full state has been applied.
    fn is_ready(&self) -> bool;
}

/// Drives the [`MetricsEngine`] from a hub.
///
/// A failed initial load or subscription is recorded as processing error and
/// reported by [`HealthCheck::health`] until the process restarts.
pub struct Exporter<H: Hub> {
    hub: H,
    engine: Arc<MetricsEngine>,
    channel_capacity: usize,
    processing_error: RwLock<Option<String>>,
    ready: AtomicBool,
}

impl<H: Hub> Exporter<H> {
    pub fn new(hub: H, engine: Arc<MetricsEngine>, channel_capacity: usize) -> Self {
        Self {
            hub,
            engine,
            channel_capacity,
            processing_error: RwLock::new(None),
            ready: AtomicBool::new(false),
        }
    }

    /// Load the initial state, then consume hub events until the hub stops
    /// delivering them.
    pub async fn start(&self) -> Result<(), ExporterError> {
        let state = match self.hub.load_current_state().await {
            Ok(state) => state,
            Err(e) => return Err(self.record(ExporterError::InitialStateLoad(e))),
        };

        info!(
            devices = state.devices.len(),
            groups = state.groups.len(),
            "Loading initial state succeeded"
        );
        self.engine.apply_state(&state);
        self.ready.store(true, Ordering::Release);

        let (tx, mut rx) = mpsc::channel(self.channel_capacity);
        if let Err(e) = self.hub.listen(tx).await {
            return Err(self.record(ExporterError::EventSubscription(e)));
        }
        info!("Event listening started");

        while let Some(event) = rx.recv().await {
            self.engine.handle_event(&event);
        }

        info!("Event stream closed");
        Ok(())
    }

    /// Stop listening for hub events, giving up after `grace`.
    pub async fn shutdown(&self, grace: Duration) -> Result<(), ExporterError> {
        tokio::time::timeout(grace, self.hub.stop_listening())
            .await
            .map_err(|_| ExporterError::ShutdownTimeout(grace))??;
        Ok(())
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    fn record(&self, err: ExporterError) -> ExporterError {
        error!(error = %err, "Hub processing failed");
        *self.processing_error.write() = Some(err.to_string());
        err
    }
}

impl<H: Hub> HealthCheck for Exporter<H> {
    fn health(&self) -> HealthReport {
        let mut report = HealthReport::new();

        if let Some(message) = self.processing_error.read().as_ref() {
            report.insert(HEALTH_SUBSYSTEM.to_string(), message.clone());
        } else if let Err(e) = self.hub.event_loop_health() {
            report.insert(HEALTH_SUBSYSTEM.to_string(), e.to_string());
        }

        report
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
