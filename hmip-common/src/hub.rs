//! Contract of the hub communication layer.
//!
//! Authentication, session handshake, transport and reconnection are the
//! implementor's business. The exporter only relies on the four operations
//! of [`Hub`].

use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::event::{HubEvent, HubState};

/// Failures reported by a [`Hub`].
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Failed to load current state: {0}")]
    StateLoad(String),

    #[error("Failed to start event listening: {0}")]
    Listen(String),

    #[error("Failed to stop event listening: {0}")]
    Stop(String),

    #[error("Event loop failed: {0}")]
    EventLoop(String),
}

/// Source of device and group state.
pub trait Hub: Send + Sync {
    /// Fetch the complete current state (all devices and groups).
    fn load_current_state(&self) -> impl Future<Output = Result<HubState, HubError>> + Send;

    /// Start delivering change events into `events`.
    ///
    /// Returns once listening has started. Events are delivered in order;
    /// the hub drops `events` when listening ends.
    fn listen(
        &self,
        events: mpsc::Sender<HubEvent>,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Stop delivering events.
    fn stop_listening(&self) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Current health of the event loop; `Ok` while it is running fine.
    fn event_loop_health(&self) -> Result<(), HubError>;
}
