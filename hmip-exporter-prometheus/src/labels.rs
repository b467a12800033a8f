//! Label set attached to every device sample.

use hmip_common::Device;
use prometheus_client::encoding::EncodeLabelSet;

use crate::rooms::RoomIndex;

/// Identity and room context of a device.
///
/// Fields are encoded in declaration order. Room fields are empty strings,
/// never absent, when the device has no known room. Values are stored escaped
/// for the text exposition, which writes them verbatim.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct DeviceLabels {
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    pub device_model: String,
    pub room_id: String,
    pub room_name: String,
}

/// Build the label set for `device`.
///
/// The room is the first group of the device's first base channel that is
/// present in `rooms`.
pub fn derive_labels(device: &Device, rooms: &RoomIndex) -> DeviceLabels {
    let (room_id, room_name) = rooms
        .resolve(device.groups())
        .map(|room| (escape_label_value(&room.id), escape_label_value(&room.name)))
        .unwrap_or_default();

    DeviceLabels {
        device_id: escape_label_value(&device.id),
        device_name: escape_label_value(&device.name),
        device_type: escape_label_value(&device.device_type),
        device_model: escape_label_value(&device.model),
        room_id,
        room_name,
    }
}

/// Escape special characters in label values.
fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmip_common::{BaseChannel, Channel, Group, SwitchChannel};

    fn meta(id: &str, name: &str) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            group_type: "META".to_string(),
        }
    }

    fn device_with_channels(channels: Vec<Channel>) -> Device {
        Device {
            id: "d1".to_string(),
            name: "Outlet".to_string(),
            device_type: "PLUGABLE_SWITCH".to_string(),
            model: "HmIP-PS".to_string(),
            last_status_update: None,
            channels,
        }
    }

    fn base_in(groups: &[&str]) -> Channel {
        Channel::Base(BaseChannel {
            groups: groups.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_identity_labels() {
        let device = device_with_channels(vec![]);
        let labels = derive_labels(&device, &RoomIndex::new());

        assert_eq!(labels.device_id, "d1");
        assert_eq!(labels.device_name, "Outlet");
        assert_eq!(labels.device_type, "PLUGABLE_SWITCH");
        assert_eq!(labels.device_model, "HmIP-PS");
        assert_eq!(labels.room_id, "");
        assert_eq!(labels.room_name, "");
    }

    #[test]
    fn test_unknown_groups_leave_room_empty() {
        let device = device_with_channels(vec![base_in(&["g-unknown"])]);
        let mut rooms = RoomIndex::new();
        rooms.update(&meta("g1", "Kitchen"));

        let labels = derive_labels(&device, &rooms);
        assert_eq!(labels.room_id, "");
        assert_eq!(labels.room_name, "");
    }

    #[test]
    fn test_first_present_group_wins() {
        let device = device_with_channels(vec![base_in(&["g1", "g2"])]);
        let mut rooms = RoomIndex::new();
        rooms.update(&meta("g2", "Hall"));

        let labels = derive_labels(&device, &rooms);
        assert_eq!(labels.room_id, "g2");
        assert_eq!(labels.room_name, "Hall");

        // Declaration order beats insertion order.
        rooms.update(&meta("g1", "Kitchen"));
        let labels = derive_labels(&device, &rooms);
        assert_eq!(labels.room_id, "g1");
        assert_eq!(labels.room_name, "Kitchen");
    }

    #[test]
    fn test_only_first_base_channel_consulted() {
        let device = device_with_channels(vec![
            Channel::Switch(SwitchChannel { on: Some(true) }),
            base_in(&["g-none"]),
            base_in(&["g1"]),
        ]);
        let mut rooms = RoomIndex::new();
        rooms.update(&meta("g1", "Kitchen"));

        let labels = derive_labels(&device, &rooms);
        assert_eq!(labels.room_id, "");
    }

    #[test]
    fn test_special_characters_escaped() {
        let mut device = device_with_channels(vec![base_in(&["g1"])]);
        device.name = "Lamp \"Big\"".to_string();
        let mut rooms = RoomIndex::new();
        rooms.update(&meta("g1", "Kid's \"Room\"\\\nX"));

        let labels = derive_labels(&device, &rooms);

        assert_eq!(labels.device_name, r#"Lamp \"Big\""#);
        assert_eq!(labels.room_name, r#"Kid's \"Room\"\\\nX"#);
        assert_eq!(labels.room_id, "g1");
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("plain"), "plain");
        assert_eq!(escape_label_value(r"a\b"), r"a\\b");
        assert_eq!(escape_label_value("a\nb"), r"a\nb");
    }
}
