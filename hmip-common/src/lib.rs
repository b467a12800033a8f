//! HomematicIP hub model.
//!
//! This crate provides the hub-side types and the collaborator contract used by the exporter:
//!
//! - [`device`] - Devices and their functional channels
//! - [`group`] - Groups, of which only room (`META`) groups matter
//! - [`event`] - Full state snapshots and push events
//! - [`hub`] - The [`Hub`] trait the exporter consumes
//! - [`replay`] - A file-backed [`Hub`] implementation
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod config;
mod de;
pub mod device;
pub mod error;
pub mod event;
pub mod group;
pub mod hub;
pub mod replay;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig, load_config, parse_config};
pub use device::{
    BaseChannel, Channel, ClimateChannel, Device, SmokeDetectorChannel, SwitchChannel,
    SwitchMeasuringChannel,
};
pub use error::{Error, Result};
pub use event::{HubEvent, HubState};
pub use group::{GROUP_TYPE_META, Group};
pub use hub::{Hub, HubError};
pub use replay::{ReplayConfig, ReplayHub};

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level` when set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
