//! Device type to adapter dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use hmip_common::device::{
    DEVICE_TYPE_HOME_CONTROL_ACCESS_POINT, DEVICE_TYPE_PLUGABLE_SWITCH,
    DEVICE_TYPE_PLUGABLE_SWITCH_MEASURING, DEVICE_TYPE_REMOTE_CONTROL_8,
    DEVICE_TYPE_SMOKE_DETECTOR, DEVICE_TYPE_TEMPERATURE_HUMIDITY_SENSOR_OUTDOOR,
};

use crate::adapters::{
    ClimateSensorAdapter, DeviceAdapter, RemoteControlAdapter, SmokeDetectorAdapter,
    SwitchAdapter,
};
use crate::error::MetricsError;
use crate::metrics::MetricRegistry;

/// Device type that is never mapped: the hub's own access point.
pub const EXCLUDED_DEVICE_TYPE: &str = DEVICE_TYPE_HOME_CONTROL_ACCESS_POINT;

/// Static mapping from declared device type to its type-specific adapter.
pub struct DispatchTable {
    adapters: HashMap<&'static str, Arc<dyn DeviceAdapter>>,
}

impl DispatchTable {
    /// Build the table, registering every adapter's gauge families.
    pub fn register(registry: &mut MetricRegistry) -> Result<Self, MetricsError> {
        let switch: Arc<dyn DeviceAdapter> = Arc::new(SwitchAdapter::register(registry)?);

        let mut adapters: HashMap<&'static str, Arc<dyn DeviceAdapter>> = HashMap::new();
        adapters.insert(DEVICE_TYPE_REMOTE_CONTROL_8, Arc::new(RemoteControlAdapter));
        adapters.insert(
            DEVICE_TYPE_TEMPERATURE_HUMIDITY_SENSOR_OUTDOOR,
            Arc::new(ClimateSensorAdapter::register(registry)?),
        );
        adapters.insert(DEVICE_TYPE_PLUGABLE_SWITCH, switch.clone());
        adapters.insert(DEVICE_TYPE_PLUGABLE_SWITCH_MEASURING, switch);
        adapters.insert(
            DEVICE_TYPE_SMOKE_DETECTOR,
            Arc::new(SmokeDetectorAdapter::register(registry)?),
        );

        Ok(Self { adapters })
    }

    /// Adapter responsible for `device_type`, if any.
    pub fn resolve(&self, device_type: &str) -> Option<&dyn DeviceAdapter> {
        self.adapters.get(device_type).map(|adapter| adapter.as_ref())
    }

    /// Whether `device_type` is filtered out before dispatch.
    pub fn is_excluded(device_type: &str) -> bool {
        device_type == EXCLUDED_DEVICE_TYPE
    }
}
