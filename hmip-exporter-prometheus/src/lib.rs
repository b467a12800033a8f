//! Prometheus metrics exporter for HomematicIP devices.
//!
//! This crate observes device and group changes from a HomematicIP hub and
//! republishes device state as labeled gauges via an HTTP `/metrics` endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Hub (snapshot  │────>│  MetricsEngine  │────>│   HTTP Server   │
//! │   + events)     │     │ (rooms, gauges) │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Each device observation is routed by its declared type through the
//! [`dispatch::DispatchTable`]. The base adapter and the type-specific adapter
//! then set their gauges with the same [`labels::DeviceLabels`], including the
//! device's room from the [`rooms::RoomIndex`].
//!
//! # Usage
//!
//! ```bash
//! hmip-exporter-prometheus --config config.json5
//! ```
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod exporter;
pub mod http;
pub mod labels;
pub mod metrics;
pub mod rooms;

pub use config::ExporterConfig;
pub use engine::{DeviceOutcome, EngineStats, MetricsEngine};
pub use error::{ExporterError, MetricsError};
pub use exporter::{Exporter, HEALTH_SUBSYSTEM, HealthCheck, HealthReport};
pub use http::HttpServer;
pub use labels::DeviceLabels;
pub use metrics::{MetricRegistry, SharedRegistry};
