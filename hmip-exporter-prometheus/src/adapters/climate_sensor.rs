//! Temperature and humidity of outdoor climate sensors.

use hmip_common::{Channel, Device};

use super::DeviceAdapter;
use crate::error::MetricsError;
use crate::labels::DeviceLabels;
use crate::metrics::{GaugeFamily, MetricRegistry, set_gauge};

const SUBSYSTEM: &str = "environment_sensor";

/// Temperature and humidity of climate sensors.
pub struct ClimateSensorAdapter {
    temperature: GaugeFamily,
    humidity: GaugeFamily,
}

impl ClimateSensorAdapter {
    pub fn register(registry: &mut MetricRegistry) -> Result<Self, MetricsError> {
        Ok(Self {
            temperature: registry.gauge_family(
                SUBSYSTEM,
                "current_temperature",
                "Current temperature measured by an environment sensor (degree celsius)",
            )?,
            humidity: registry.gauge_family(
                SUBSYSTEM,
                "current_humidity",
                "Current relative humidity measured by an environment sensor (percent)",
            )?,
        })
    }
}

impl DeviceAdapter for ClimateSensorAdapter {
    fn name(&self) -> &'static str {
        "climate_sensor"
    }

    fn update(&self, device: &Device, labels: &DeviceLabels) {
        for channel in &device.channels {
            if let Channel::Climate(climate) = channel {
                if let Some(temperature) = climate.actual_temperature {
                    set_gauge(&self.temperature, labels, temperature);
                }
                if let Some(humidity) = climate.humidity {
                    set_gauge(&self.humidity, labels, humidity);
                }
            }
        }
    }
}
