//! Status gauges every recognized device gets.
//!
//! Reachability is exported inverted (1 = reachable), the other flags as
//! 1 = condition present. RSSI and the last-seen timestamp are only written
//! when the hub reports them.

use hmip_common::Device;

use super::DeviceAdapter;
use crate::error::MetricsError;
use crate::labels::DeviceLabels;
use crate::metrics::{GaugeFamily, MetricRegistry, flag, set_gauge};

const SUBSYSTEM: &str = "device";

/// Status gauges shared by every recognized device.
pub struct BaseAdapter {
    reachable: GaugeFamily,
    connection_quality: GaugeFamily,
    last_seen: GaugeFamily,
    battery_low: GaugeFamily,
    under_voltage: GaugeFamily,
    overheated: GaugeFamily,
}

impl BaseAdapter {
    pub fn register(registry: &mut MetricRegistry) -> Result<Self, MetricsError> {
        Ok(Self {
            reachable: registry.gauge_family(
                SUBSYSTEM,
                "reachable",
                "Reachability of a device (0 = unreachable, 1 = reachable)",
            )?,
            connection_quality: registry.gauge_family(
                SUBSYSTEM,
                "connection_quality_rssi",
                "Current connection quality",
            )?,
            last_seen: registry.gauge_family(
                SUBSYSTEM,
                "last_seen_timestamp",
                "Last time the device was seen (Unix timestamp in seconds)",
            )?,
            battery_low: registry.gauge_family(
                SUBSYSTEM,
                "battery_low",
                "Current battery status of a device (0 = ok, 1 = low)",
            )?,
            under_voltage: registry.gauge_family(
                SUBSYSTEM,
                "under_voltage",
                "Current undervoltage status of a device (0 = ok, 1 = undervoltage)",
            )?,
            overheated: registry.gauge_family(
                SUBSYSTEM,
                "overheated",
                "Current temperature status of a device (0 = ok, 1 = overheated)",
            )?,
        })
    }
}

impl DeviceAdapter for BaseAdapter {
    fn name(&self) -> &'static str {
        "base"
    }

    fn update(&self, device: &Device, labels: &DeviceLabels) {
        if let Some(last_seen) = device.last_status_update {
            set_gauge(&self.last_seen, labels, last_seen.timestamp() as f64);
        }

        for base in device.base_channels() {
            set_gauge(&self.reachable, labels, flag(!base.is_unreached()));
            set_gauge(&self.overheated, labels, flag(base.is_overheated()));
            set_gauge(&self.battery_low, labels, flag(base.has_low_battery()));
            set_gauge(&self.under_voltage, labels, flag(base.has_under_voltage()));
            if let Some(rssi) = base.rssi {
                set_gauge(&self.connection_quality, labels, f64::from(rssi));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{device, labels_for};
    use chrono::{TimeZone, Utc};
    use hmip_common::{BaseChannel, Channel};

    fn adapter() -> (MetricRegistry, BaseAdapter) {
        let mut registry = MetricRegistry::new();
        let adapter = BaseAdapter::register(&mut registry).unwrap();
        (registry, adapter)
    }

    #[test]
    fn test_registers_six_families() {
        let (registry, _) = adapter();
        assert_eq!(registry.family_count(), 6);
    }

    #[test]
    fn test_reachable_is_inverted() {
        let (_, adapter) = adapter();
        let reachable = device(
            "SMOKE_DETECTOR",
            vec![Channel::Base(BaseChannel {
                unreach: Some(false),
                ..Default::default()
            })],
        );
        let labels = labels_for(&reachable);

        adapter.update(&reachable, &labels);
        assert_eq!(adapter.reachable.get_or_create(&labels).get(), 1.0);

        let mut unreached = reachable.clone();
        unreached.channels = vec![Channel::Base(BaseChannel {
            unreach: Some(true),
            ..Default::default()
        })];
        adapter.update(&unreached, &labels);
        assert_eq!(adapter.reachable.get_or_create(&labels).get(), 0.0);
    }

    #[test]
    fn test_status_flags_and_rssi() {
        let (_, adapter) = adapter();
        let mut dev = device(
            "SMOKE_DETECTOR",
            vec![Channel::Base(BaseChannel {
                unreach: Some(false),
                overheated: Some(true),
                low_battery: Some(true),
                under_voltage: Some(false),
                rssi: Some(-72),
                groups: vec![],
            })],
        );
        dev.last_status_update = Some(Utc.timestamp_opt(1_703_500_000, 0).unwrap());
        let labels = labels_for(&dev);

        adapter.update(&dev, &labels);

        assert_eq!(adapter.overheated.get_or_create(&labels).get(), 1.0);
        assert_eq!(adapter.battery_low.get_or_create(&labels).get(), 1.0);
        assert_eq!(adapter.under_voltage.get_or_create(&labels).get(), 0.0);
        assert_eq!(adapter.connection_quality.get_or_create(&labels).get(), -72.0);
        assert_eq!(
            adapter.last_seen.get_or_create(&labels).get(),
            1_703_500_000.0
        );
    }

    #[test]
    fn test_null_flags_read_as_ok() {
        let (_, adapter) = adapter();
        let dev = device(
            "PLUGABLE_SWITCH",
            vec![Channel::Base(BaseChannel::default())],
        );
        let labels = labels_for(&dev);

        adapter.update(&dev, &labels);

        assert_eq!(adapter.reachable.get_or_create(&labels).get(), 1.0);
        assert_eq!(adapter.battery_low.get_or_create(&labels).get(), 0.0);
    }

    #[test]
    fn test_without_base_channel() {
        let (registry, adapter) = adapter();
        let dev = device("PLUGABLE_SWITCH", vec![Channel::Unknown]);

        adapter.update(&dev, &labels_for(&dev));

        let output = registry.render().unwrap();
        assert!(!output.contains("device_id=\"d1\""));
    }
}
