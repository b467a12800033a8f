//! Placeholder adapter for remote controls.

use hmip_common::Device;

use super::DeviceAdapter;
use crate::labels::DeviceLabels;

/// Remote controls have no gauges of their own yet, only the base ones.
pub struct RemoteControlAdapter;

impl DeviceAdapter for RemoteControlAdapter {
    fn name(&self) -> &'static str {
        "remote_control"
    }

    fn update(&self, _device: &Device, _labels: &DeviceLabels) {}
}
