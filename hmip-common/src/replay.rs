//! File-backed [`Hub`] that replays a recorded state snapshot and push events.
//!
//! The state file holds the hub's full-state JSON. The optional events file holds
//! one push event per line (JSON lines); with `follow` enabled, lines appended
//! later are picked up as well.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::event::{HubEvent, HubState};
use crate::hub::{Hub, HubError};

/// Replay hub configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Path to the full-state JSON file.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Path to a JSON-lines file of push events.
    #[serde(default)]
    pub events_file: Option<PathBuf>,

    /// Keep reading lines appended to the events file.
    #[serde(default)]
    pub follow: bool,

    /// Poll interval while following (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("hmip-state.json")
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            events_file: None,
            follow: false,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Hub reading its state and events from files.
pub struct ReplayHub {
    config: ReplayConfig,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
    loop_error: Arc<RwLock<Option<String>>>,
}

impl ReplayHub {
    pub fn new(config: ReplayConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            shutdown,
            task: Mutex::new(None),
            loop_error: Arc::new(RwLock::new(None)),
        }
    }
}

impl Hub for ReplayHub {
    async fn load_current_state(&self) -> Result<HubState, HubError> {
        let path = &self.config.state_file;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HubError::StateLoad(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| HubError::StateLoad(format!("{}: {}", path.display(), e)))
    }

    async fn listen(&self, events: mpsc::Sender<HubEvent>) -> Result<(), HubError> {
        let Some(path) = self.config.events_file.clone() else {
            info!("No events file configured, nothing to replay");
            return Ok(());
        };

        let file = File::open(&path)
            .await
            .map_err(|e| HubError::Listen(format!("{}: {}", path.display(), e)))?;

        let mut shutdown = self.shutdown.subscribe();
        let follow = self.config.follow;
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let loop_error = self.loop_error.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = stream_events(file, events, &mut shutdown, follow, poll_interval).await
            {
                error!(error = %e, "Event replay failed");
                *loop_error.write() = Some(e.to_string());
            }
        });
        *self.task.lock() = Some(handle);

        info!(path = %path.display(), follow, "Replaying hub events");
        Ok(())
    }

    async fn stop_listening(&self) -> Result<(), HubError> {
        self.shutdown.send_replace(true);

        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            handle.await.map_err(|e| HubError::Stop(e.to_string()))?;
        }
        Ok(())
    }

    fn event_loop_health(&self) -> Result<(), HubError> {
        match self.loop_error.read().as_ref() {
            Some(message) => Err(HubError::EventLoop(message.clone())),
            None => Ok(()),
        }
    }
}

/// Read events line by line until EOF (or shutdown when following).
async fn stream_events(
    file: File,
    events: mpsc::Sender<HubEvent>,
    shutdown: &mut watch::Receiver<bool>,
    follow: bool,
    poll_interval: Duration,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(file);
    let mut line = String::new();

    loop {
        if *shutdown.borrow() {
            return Ok(());
        }

        let read = tokio::select! {
            read = reader.read_line(&mut line) => read?,
            _ = shutdown.changed() => return Ok(()),
        };

        if read == 0 {
            if !follow {
                debug!("Reached end of events file");
                return Ok(());
            }
            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => continue,
                _ = shutdown.changed() => return Ok(()),
            }
        }

        // Partial line while following: wait for the writer to finish it.
        if follow && !line.ends_with('\n') {
            continue;
        }

        let payload = line.trim();
        if !payload.is_empty() {
            match serde_json::from_str::<HubEvent>(payload) {
                Ok(event) => {
                    trace!(?event, "Replaying event");
                    if events.send(event).await.is_err() {
                        debug!("Event receiver closed");
                        return Ok(());
                    }
                }
                Err(e) => warn!(error = %e, "Skipping malformed event line"),
            }
        }
        line.clear();
    }
}
