//! Error types for the exporter.

use std::time::Duration;

use hmip_common::HubError;
use thiserror::Error;

/// Errors raised while building or rendering the metric registry.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A family with the same name was registered before.
    #[error("Metric family already registered: {0}")]
    DuplicateFamily(String),

    #[error("Failed to encode metrics: {0}")]
    Encode(#[from] std::fmt::Error),
}

/// Errors that can occur in the exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// The initial full-state load failed.
    #[error("could not load initial state: {0}")]
    InitialStateLoad(#[source] HubError),

    /// The hub refused to start delivering events.
    #[error("could not start event listening: {0}")]
    EventSubscription(#[source] HubError),

    /// The hub did not stop listening within the grace period.
    #[error("event listening did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("Hub error: {0}")]
    Hub(#[from] HubError),
}
