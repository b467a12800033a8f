//! Registry of the exported gauge families.
//!
//! Families are registered once at startup, before the registry is shared with
//! the HTTP endpoint. Registering a name twice is a programming error and is
//! reported as [`MetricsError::DuplicateFamily`], which aborts startup.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use tracing::debug;

use crate::error::MetricsError;
use crate::labels::DeviceLabels;

/// Namespace prefix of every exported metric.
pub const NAMESPACE: &str = "hmip";

/// A last-value gauge indexed by the device label set.
pub type GaugeFamily = Family<DeviceLabels, Gauge<f64, AtomicU64>>;

/// Set `value` for `labels`, replacing whatever was there before.
pub fn set_gauge(family: &GaugeFamily, labels: &DeviceLabels, value: f64) {
    family.get_or_create(labels).set(value);
}

/// Gauge value for a boolean state.
pub fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Process-wide metric registry.
pub struct MetricRegistry {
    registry: Registry,
    registered: HashSet<String>,
}

impl MetricRegistry {
    /// Create an empty registry under the `hmip` namespace.
    pub fn new() -> Self {
        Self {
            registry: Registry::with_prefix(NAMESPACE),
            registered: HashSet::new(),
        }
    }

    /// Register a gauge family named `hmip_<subsystem>_<name>`.
    pub fn gauge_family(
        &mut self,
        subsystem: &str,
        name: &str,
        help: &str,
    ) -> Result<GaugeFamily, MetricsError> {
        let local_name = format!("{}_{}", subsystem, name);
        if !self.registered.insert(local_name.clone()) {
            return Err(MetricsError::DuplicateFamily(format!(
                "{}_{}",
                NAMESPACE, local_name
            )));
        }

        let family = GaugeFamily::default();
        self.registry.register(local_name.as_str(), help, family.clone());
        debug!(family = %local_name, "Registered gauge family");

        Ok(family)
    }

    /// Number of registered families.
    pub fn family_count(&self) -> usize {
        self.registered.len()
    }

    /// Render all families in the text exposition format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut output = String::new();
        encode(&mut output, &self.registry)?;
        Ok(output)
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a shareable registry handle.
pub type SharedRegistry = Arc<MetricRegistry>;
