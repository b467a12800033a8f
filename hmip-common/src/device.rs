//! Devices and their functional channels, as reported by the hub.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::{self, Deserializer};

use crate::de::null_as_default;

/// The hub's own access point. Never mapped to metrics.
pub const DEVICE_TYPE_HOME_CONTROL_ACCESS_POINT: &str = "HOME_CONTROL_ACCESS_POINT";
/// Eight-button remote control.
pub const DEVICE_TYPE_REMOTE_CONTROL_8: &str = "REMOTE_CONTROL_8";
/// Outdoor temperature and humidity sensor.
pub const DEVICE_TYPE_TEMPERATURE_HUMIDITY_SENSOR_OUTDOOR: &str =
    "TEMPERATURE_HUMIDITY_SENSOR_OUTDOOR";
/// Pluggable switch without power measurement.
pub const DEVICE_TYPE_PLUGABLE_SWITCH: &str = "PLUGABLE_SWITCH";
/// Pluggable switch with power measurement.
pub const DEVICE_TYPE_PLUGABLE_SWITCH_MEASURING: &str = "PLUGABLE_SWITCH_MEASURING";
/// Smoke detector.
pub const DEVICE_TYPE_SMOKE_DETECTOR: &str = "SMOKE_DETECTOR";

/// A device known to the hub.
///
/// This is a read-only view; the exporter never keeps devices around between events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Device {
    /// Hub identifier (SGTIN).
    pub id: String,

    /// Display name given by the user.
    #[serde(rename = "label", default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Declared device type, e.g. `PLUGABLE_SWITCH_MEASURING`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub device_type: String,

    /// Hardware model, e.g. `HmIP-PSM`.
    #[serde(rename = "modelType", default, deserialize_with = "null_as_default")]
    pub model: String,

    /// When the hub last heard from the device.
    #[serde(
        rename = "lastStatusUpdate",
        default,
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_status_update: Option<DateTime<Utc>>,

    /// Functional channels in index order.
    #[serde(
        rename = "functionalChannels",
        default,
        deserialize_with = "channels_by_index"
    )]
    pub channels: Vec<Channel>,
}

impl Device {
    /// Iterate over the device's base channels in declaration order.
    pub fn base_channels(&self) -> impl Iterator<Item = &BaseChannel> {
        self.channels.iter().filter_map(|channel| match channel {
            Channel::Base(base) => Some(base),
            _ => None,
        })
    }

    /// Group memberships of the device, taken from its first base channel.
    pub fn groups(&self) -> &[String] {
        self.base_channels()
            .next()
            .map(|base| base.groups.as_slice())
            .unwrap_or_default()
    }
}

/// The hub keys channels by their index as a string ("0", "1", ...).
fn channels_by_index<'de, D>(deserializer: D) -> Result<Vec<Channel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Channel>>::deserialize(deserializer)?.unwrap_or_default();

    let mut indexed = raw
        .into_iter()
        .map(|(index, channel)| {
            index
                .parse::<u32>()
                .map(|i| (i, channel))
                .map_err(|_| de::Error::custom(format!("invalid channel index '{}'", index)))
        })
        .collect::<Result<Vec<_>, D::Error>>()?;
    indexed.sort_by_key(|(index, _)| *index);

    Ok(indexed.into_iter().map(|(_, channel)| channel).collect())
}

/// A functional channel of a device.
///
/// Channel kinds this crate does not model decode as [`Channel::Unknown`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "functionalChannelType")]
pub enum Channel {
    #[serde(rename = "DEVICE_BASE")]
    Base(BaseChannel),
    #[serde(rename = "CLIMATE_SENSOR_CHANNEL")]
    Climate(ClimateChannel),
    #[serde(rename = "SWITCH_CHANNEL")]
    Switch(SwitchChannel),
    #[serde(rename = "SWITCH_MEASURING_CHANNEL")]
    SwitchMeasuring(SwitchMeasuringChannel),
    #[serde(rename = "SMOKE_DETECTOR_CHANNEL")]
    SmokeDetector(SmokeDetectorChannel),
    #[serde(other)]
    Unknown,
}

/// Status channel present on (almost) every device.
///
/// The hub reports `null` for flags that do not apply to a device,
/// e.g. `lowBat` on a mains powered outlet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BaseChannel {
    pub unreach: Option<bool>,
    #[serde(rename = "deviceOverheated")]
    pub overheated: Option<bool>,
    #[serde(rename = "lowBat")]
    pub low_battery: Option<bool>,
    #[serde(rename = "deviceUndervoltage")]
    pub under_voltage: Option<bool>,
    #[serde(rename = "rssiDeviceValue")]
    pub rssi: Option<i32>,
    /// Identifiers of the groups this channel belongs to, in hub order.
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Vec<String>,
}

impl BaseChannel {
    pub fn is_unreached(&self) -> bool {
        self.unreach.unwrap_or(false)
    }

    pub fn is_overheated(&self) -> bool {
        self.overheated.unwrap_or(false)
    }

    pub fn has_low_battery(&self) -> bool {
        self.low_battery.unwrap_or(false)
    }

    pub fn has_under_voltage(&self) -> bool {
        self.under_voltage.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClimateChannel {
    /// Degrees celsius.
    #[serde(rename = "actualTemperature")]
    pub actual_temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwitchChannel {
    pub on: Option<bool>,
}

impl SwitchChannel {
    pub fn is_on(&self) -> bool {
        self.on.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwitchMeasuringChannel {
    pub on: Option<bool>,
    /// Watts.
    #[serde(rename = "currentPowerConsumption")]
    pub current_power_consumption: Option<f64>,
}

impl SwitchMeasuringChannel {
    pub fn is_on(&self) -> bool {
        self.on.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmokeDetectorChannel {
    #[serde(rename = "chamberDegraded")]
    pub chamber_degraded: Option<bool>,
}

impl SmokeDetectorChannel {
    pub fn is_chamber_degraded(&self) -> bool {
        self.chamber_degraded.unwrap_or(false)
    }
}
