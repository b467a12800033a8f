//! Per-event update pipeline.
//!
//! The engine is driven by a single consumer task (see [`crate::exporter`]),
//! one event at a time. The room index still sits behind a lock and the gauge
//! families synchronise internally, because the HTTP task scrapes concurrently.

use hmip_common::{Device, Group, HubEvent, HubState};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::adapters::{BaseAdapter, DeviceAdapter};
use crate::dispatch::DispatchTable;
use crate::error::MetricsError;
use crate::labels::derive_labels;
use crate::metrics::MetricRegistry;
use crate::rooms::RoomIndex;

/// What happened to a device observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOutcome {
    /// Base and type-specific gauges were set.
    Updated { adapter: &'static str },
    /// The device is the hub's access point.
    Excluded,
    /// No adapter is registered for the device type.
    Unrecognized,
}

/// Engine statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Devices mapped to metrics.
    pub devices_updated: u64,
    /// Access point observations skipped.
    pub devices_excluded: u64,
    /// Observations of device types without an adapter.
    pub devices_unrecognized: u64,
    /// Room groups upserted into the room index.
    pub rooms_updated: u64,
    /// Non-room groups ignored.
    pub groups_ignored: u64,
}

/// Maps hub observations to gauge updates.
pub struct MetricsEngine {
    rooms: RwLock<RoomIndex>,
    base: BaseAdapter,
    dispatch: DispatchTable,
    stats: RwLock<EngineStats>,
}

impl MetricsEngine {
    /// Create the engine, registering all gauge families in `registry`.
    pub fn new(registry: &mut MetricRegistry) -> Result<Self, MetricsError> {
        Ok(Self {
            rooms: RwLock::new(RoomIndex::new()),
            base: BaseAdapter::register(registry)?,
            dispatch: DispatchTable::register(registry)?,
            stats: RwLock::new(EngineStats::default()),
        })
    }

    /// Apply a full state snapshot: rooms first, then devices.
    pub fn apply_state(&self, state: &HubState) {
        for group in &state.groups {
            self.update_group(group);
        }
        for device in &state.devices {
            self.update_device(device);
        }
    }

    /// Apply a single push event.
    pub fn handle_event(&self, event: &HubEvent) {
        match event {
            HubEvent::DeviceChanged { device } => {
                self.update_device(device);
            }
            HubEvent::GroupChanged { group } => {
                self.update_group(group);
            }
            HubEvent::Other => trace!("Ignoring unrelated hub event"),
        }
    }

    /// Record a group; only rooms are kept.
    pub fn update_group(&self, group: &Group) {
        let updated = self.rooms.write().update(group);

        let mut stats = self.stats.write();
        if updated {
            stats.rooms_updated += 1;
            debug!(group_id = %group.id, room_name = %group.name, "Room updated");
        } else {
            stats.groups_ignored += 1;
            trace!(
                group_id = %group.id,
                group_type = %group.group_type,
                "Ignoring non-room group"
            );
        }
    }

    /// Map a device observation to gauges.
    pub fn update_device(&self, device: &Device) -> DeviceOutcome {
        if DispatchTable::is_excluded(&device.device_type) {
            self.stats.write().devices_excluded += 1;
            trace!(device_id = %device.id, "Skipping access point");
            return DeviceOutcome::Excluded;
        }

        let Some(adapter) = self.dispatch.resolve(&device.device_type) else {
            self.stats.write().devices_unrecognized += 1;
            warn!(
                device_id = %device.id,
                device_type = %device.device_type,
                "No metric registered for device type"
            );
            return DeviceOutcome::Unrecognized;
        };

        let labels = derive_labels(device, &self.rooms.read());
        self.base.update(device, &labels);
        adapter.update(device, &labels);

        self.stats.write().devices_updated += 1;
        trace!(
            device_id = %device.id,
            adapter = adapter.name(),
            room_id = %labels.room_id,
            "Device metrics updated"
        );

        DeviceOutcome::Updated {
            adapter: adapter.name(),
        }
    }

    /// Number of rooms currently known.
    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }

    /// Get engine statistics.
    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }
}
