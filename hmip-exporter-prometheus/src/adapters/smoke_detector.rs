//! Smoke chamber status of smoke detectors.

use hmip_common::{Channel, Device};

use super::DeviceAdapter;
use crate::error::MetricsError;
use crate::labels::DeviceLabels;
use crate::metrics::{GaugeFamily, MetricRegistry, flag, set_gauge};

/// Chamber degradation of smoke detectors.
pub struct SmokeDetectorAdapter {
    chamber_degraded: GaugeFamily,
}

impl SmokeDetectorAdapter {
    pub fn register(registry: &mut MetricRegistry) -> Result<Self, MetricsError> {
        Ok(Self {
            chamber_degraded: registry.gauge_family(
                "smoke_detector",
                "smoke_chamber_degraded",
                "Current smoke chamber status of a smoke detector (0 = ok, 1 = degraded)",
            )?,
        })
    }
}

impl DeviceAdapter for SmokeDetectorAdapter {
    fn name(&self) -> &'static str {
        "smoke_detector"
    }

    fn update(&self, device: &Device, labels: &DeviceLabels) {
        for channel in &device.channels {
            if let Channel::SmokeDetector(smoke) = channel {
                set_gauge(
                    &self.chamber_degraded,
                    labels,
                    flag(smoke.is_chamber_degraded()),
                );
            }
        }
    }
}
