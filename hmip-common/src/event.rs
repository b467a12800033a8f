//! Hub snapshots and push events.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::device::Device;
use crate::group::Group;

/// Full hub state as returned by the initial state load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HubState {
    /// All devices, ordered by identifier.
    #[serde(default, deserialize_with = "values_by_id")]
    pub devices: Vec<Device>,

    /// All groups, ordered by identifier.
    #[serde(default, deserialize_with = "values_by_id")]
    pub groups: Vec<Group>,
}

/// The hub reports devices and groups as objects keyed by identifier.
///
/// An entry that does not decode is logged and left out, so one odd device
/// does not hide the rest of the home.
fn values_by_id<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let by_id = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?
        .unwrap_or_default();

    Ok(by_id
        .into_iter()
        .filter_map(|(id, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(id = %id, error = %e, "Skipping entry that does not decode");
                None
            }
        })
        .collect())
}

/// A change notification pushed by the hub.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "pushEventType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HubEvent {
    DeviceChanged { device: Device },
    GroupChanged { group: Group },
    /// Any event type the exporter does not consume.
    #[serde(other)]
    Other,
}
