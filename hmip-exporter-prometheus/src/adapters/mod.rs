//! Per-category mapping from device channels to gauges.
//!
//! Every adapter matches only the channel variants it understands and skips
//! everything else, so devices with additional or unknown channels still map.

mod base;
mod climate_sensor;
mod remote_control;
mod smoke_detector;
mod switch;

pub use base::BaseAdapter;
pub use climate_sensor::ClimateSensorAdapter;
pub use remote_control::RemoteControlAdapter;
pub use smoke_detector::SmokeDetectorAdapter;
pub use switch::SwitchAdapter;

use hmip_common::Device;

use crate::labels::DeviceLabels;

/// Maps one device category to its gauges.
pub trait DeviceAdapter: Send + Sync {
    /// Short adapter name, used in logs.
    fn name(&self) -> &'static str;

    /// Set the gauges this adapter owns from `device`'s channels.
    fn update(&self, device: &Device, labels: &DeviceLabels);
}
