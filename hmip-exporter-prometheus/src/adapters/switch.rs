//! Switch state and active power of pluggable outlets.

use hmip_common::{Channel, Device};

use super::DeviceAdapter;
use crate::error::MetricsError;
use crate::labels::DeviceLabels;
use crate::metrics::{GaugeFamily, MetricRegistry, flag, set_gauge};

const SUBSYSTEM: &str = "outlet";

/// Switch state and, for measuring outlets, active power.
///
/// One instance serves both plain and measuring switch types.
pub struct SwitchAdapter {
    state: GaugeFamily,
    active_power: GaugeFamily,
}

impl SwitchAdapter {
    pub fn register(registry: &mut MetricRegistry) -> Result<Self, MetricsError> {
        Ok(Self {
            state: registry.gauge_family(
                SUBSYSTEM,
                "current_state",
                "Current switch state of an outlet (0 = off, 1 = on)",
            )?,
            active_power: registry.gauge_family(
                SUBSYSTEM,
                "current_active_power",
                "Power currently consumed at an outlet - consumers only (watts)",
            )?,
        })
    }
}

impl DeviceAdapter for SwitchAdapter {
    fn name(&self) -> &'static str {
        "switch"
    }

    fn update(&self, device: &Device, labels: &DeviceLabels) {
        for channel in &device.channels {
            match channel {
                Channel::SwitchMeasuring(measuring) => {
                    set_gauge(&self.state, labels, flag(measuring.is_on()));
                    if let Some(power) = measuring.current_power_consumption {
                        set_gauge(&self.active_power, labels, power);
                    }
                }
                Channel::Switch(switch) => {
                    set_gauge(&self.state, labels, flag(switch.is_on()));
                }
                _ => {}
            }
        }
    }
}
