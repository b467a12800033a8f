//! Configuration for the HomematicIP exporter.

use hmip_common::{LoggingConfig, ReplayConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] hmip_common::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Hub connection settings.
    #[serde(default)]
    pub hub: ReplayConfig,

    /// Event delivery settings.
    #[serde(default)]
    pub events: EventsConfig,

    /// Prometheus endpoint settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,

    /// Shutdown behaviour.
    #[serde(default)]
    pub shutdown: ShutdownConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Event delivery from the hub to the update pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Capacity of the event channel (default: 256).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Prometheus HTTP endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Address to listen on (default: "0.0.0.0:9100").
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_listen() -> String {
    "0.0.0.0:9100".to_string()
}

fn default_path() -> String {
    "/metrics".to_string()
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// How long to wait for tasks to finish after a termination signal (seconds).
    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u64,
}

fn default_grace_period() -> u64 {
    5
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period(),
        }
    }
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: ExporterConfig = hmip_common::load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = hmip_common::parse_config(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hub.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_ms must be > 0".to_string(),
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigError::Validation(
                "channel_capacity must be > 0".to_string(),
            ));
        }

        if self.shutdown.grace_period_secs == 0 {
            return Err(ConfigError::Validation(
                "grace_period_secs must be > 0".to_string(),
            ));
        }

        if self
            .prometheus
            .listen
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address: {}",
                self.prometheus.listen
            )));
        }

        if !self.prometheus.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "Metrics path must start with /".to_string(),
            ));
        }

        if self.prometheus.path == "/health" || self.prometheus.path == "/ready" {
            return Err(ConfigError::Validation(format!(
                "Metrics path {} collides with a built-in endpoint",
                self.prometheus.path
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmip_common::LogFormat;
    use std::path::PathBuf;

    #[test]
    fn test_parse_minimal_config() {
        let config = ExporterConfig::parse("{}").unwrap();

        assert_eq!(config.prometheus.listen, "0.0.0.0:9100");
        assert_eq!(config.prometheus.path, "/metrics");
        assert_eq!(config.hub.state_file, PathBuf::from("hmip-state.json"));
        assert!(config.hub.events_file.is_none());
        assert!(!config.hub.follow);
        assert_eq!(config.events.channel_capacity, 256);
        assert_eq!(config.shutdown.grace_period_secs, 5);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            hub: {
                state_file: "/var/lib/hmip/state.json",
                events_file: "/var/lib/hmip/events.jsonl",
                follow: true,
                poll_interval_ms: 250,
            },
            events: { channel_capacity: 64 },
            prometheus: {
                listen: "127.0.0.1:9200",
                path: "/prometheus/metrics",
            },
            shutdown: { grace_period_secs: 10 },
            logging: {
                level: "debug",
                format: "json"
            }
        }"#;

        let config = ExporterConfig::parse(json).unwrap();

        assert_eq!(
            config.hub.state_file,
            PathBuf::from("/var/lib/hmip/state.json")
        );
        assert_eq!(
            config.hub.events_file,
            Some(PathBuf::from("/var/lib/hmip/events.jsonl"))
        );
        assert!(config.hub.follow);
        assert_eq!(config.hub.poll_interval_ms, 250);
        assert_eq!(config.events.channel_capacity, 64);
        assert_eq!(config.prometheus.listen, "127.0.0.1:9200");
        assert_eq!(config.prometheus.path, "/prometheus/metrics");
        assert_eq!(config.shutdown.grace_period_secs, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_invalid_listen() {
        let json = r#"{
            prometheus: { listen: "not-an-address" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid listen address")
        );
    }

    #[test]
    fn test_validate_invalid_path() {
        let json = r#"{
            prometheus: { path: "no-leading-slash" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("must start with /")
        );
    }

    #[test]
    fn test_validate_path_collision() {
        let result = ExporterConfig::parse(r#"{ prometheus: { path: "/health" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_zero_values() {
        assert!(ExporterConfig::parse("{ events: { channel_capacity: 0 } }").is_err());
        assert!(ExporterConfig::parse("{ hub: { poll_interval_ms: 0 } }").is_err());
        assert!(ExporterConfig::parse("{ shutdown: { grace_period_secs: 0 } }").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ExporterConfig::load_from_file("/nonexistent/exporter.json5");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = ExporterConfig::parse(include_str!("../config.example.json5")).unwrap();

        assert!(config.hub.follow);
        assert_eq!(
            config.hub.events_file,
            Some(PathBuf::from("/var/lib/hmip-exporter/events.jsonl"))
        );
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_invalid_syntax() {
        let result = ExporterConfig::parse("{ prometheus: ");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
