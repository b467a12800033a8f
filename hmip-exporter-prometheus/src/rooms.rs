//! Index of known rooms, kept current from group events.

use std::collections::HashMap;

use hmip_common::Group;

/// A room (`META` group) known to the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
}

/// Room lookup by group identifier.
///
/// Entries are only inserted or overwritten; rooms removed on the hub stay
/// until restart.
#[derive(Debug, Default)]
pub struct RoomIndex {
    rooms: HashMap<String, Room>,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert `group` if it is a room. Returns whether the index was touched.
    pub fn update(&mut self, group: &Group) -> bool {
        if !group.is_meta() {
            return false;
        }

        self.rooms.insert(
            group.id.clone(),
            Room {
                id: group.id.clone(),
                name: group.name.clone(),
            },
        );
        true
    }

    /// Display name of the room with identifier `room_id`.
    pub fn lookup(&self, room_id: &str) -> Option<&str> {
        self.rooms.get(room_id).map(|room| room.name.as_str())
    }

    /// First entry of `group_ids` that is a known room.
    pub fn resolve(&self, group_ids: &[String]) -> Option<&Room> {
        group_ids.iter().find_map(|id| self.rooms.get(id))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
