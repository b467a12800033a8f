use serde::Deserialize;

use crate::de::null_as_default;

/// Group type the hub uses to represent rooms.
pub const GROUP_TYPE_META: &str = "META";

/// A hub-side collection of devices.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(rename = "label", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub group_type: String,
}

impl Group {
    /// Whether this group represents a room.
    pub fn is_meta(&self) -> bool {
        self.group_type == GROUP_TYPE_META
    }
}
