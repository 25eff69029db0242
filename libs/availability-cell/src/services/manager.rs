use std::collections::BTreeMap;

use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::AvailabilityError;
use crate::models::{
    AvailabilityType, CreateSlotRequest, DaySummary, DayOfWeek, Slot, SlotKey, UpdateSlotRequest,
};
use crate::services::store::AvailabilityStore;
use crate::services::validation::validate_slot;

/// A slot in the local working set, tagged with its identity and whether a
/// persisted slot carries unsaved edits.
#[derive(Debug, Clone)]
pub struct TrackedSlot {
    pub key: SlotKey,
    pub slot: Slot,
    pub dirty: bool,
}

impl TrackedSlot {
    fn is_pending(&self) -> bool {
        matches!(self.key, SlotKey::Pending(_))
    }
}

/// Working copy of one doctor's weekly availability.
///
/// Pending slots live only here until a save bulk-creates them; persisted
/// slots mirror the remote store and are re-pushed individually when edited.
/// Every save ends with a refetch, so the remote store stays authoritative:
/// nothing completed is ever rolled back, the next refetch reconciles.
pub struct SlotManager {
    doctor_id: Uuid,
    store: AvailabilityStore,
    slots: Vec<TrackedSlot>,
    next_local_key: u64,
}

impl SlotManager {
    pub fn new(doctor_id: Uuid, config: &AppConfig) -> Self {
        Self {
            doctor_id,
            store: AvailabilityStore::new(config),
            slots: Vec::new(),
            next_local_key: 0,
        }
    }

    pub fn doctor_id(&self) -> Uuid {
        self.doctor_id
    }

    pub fn slots(&self) -> &[TrackedSlot] {
        &self.slots
    }

    pub fn current_slots(&self) -> Vec<Slot> {
        self.slots.iter().map(|t| t.slot.clone()).collect()
    }

    pub fn get(&self, key: SlotKey) -> Option<&Slot> {
        self.position(key).map(|idx| &self.slots[idx].slot)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.slots.iter().any(|t| t.is_pending() || t.dirty)
    }

    fn position(&self, key: SlotKey) -> Option<usize> {
        self.slots.iter().position(|t| t.key == key)
    }

    fn pairs(&self) -> impl Iterator<Item = (SlotKey, &Slot)> + '_ {
        self.slots.iter().map(|t| (t.key, &t.slot))
    }

    /// Replace local persisted state with the authoritative remote copy.
    /// Pending slots survive untouched.
    fn replace_persisted(&mut self, fetched: Vec<Slot>) {
        self.slots.retain(TrackedSlot::is_pending);
        for slot in fetched {
            let Some(id) = slot.id else {
                warn!("Remote store returned a slot without an id, skipping");
                continue;
            };
            self.slots.push(TrackedSlot {
                key: SlotKey::Persisted(id),
                slot,
                dirty: false,
            });
        }
        self.slots.sort_by_key(|t| {
            (
                t.slot.day_of_week,
                t.slot.start_time,
                t.is_pending(),
            )
        });
    }

    pub async fn load(&mut self, auth_token: &str) -> Result<(), AvailabilityError> {
        let fetched = self.store.get_availability(self.doctor_id, auth_token).await?;
        debug!("Loaded {} slots for doctor {}", fetched.len(), self.doctor_id);
        self.replace_persisted(fetched);
        Ok(())
    }

    /// Discard pending slots and reload from the remote store.
    pub async fn reset(&mut self, auth_token: &str) -> Result<(), AvailabilityError> {
        self.slots.retain(|t| !t.is_pending());
        self.load(auth_token).await
    }

    /// Add a slot locally; it stays pending (no id, no remote call) until the
    /// next save.
    pub fn add_slot(&mut self, request: &CreateSlotRequest) -> Result<SlotKey, AvailabilityError> {
        let slot = Slot::from_request(self.doctor_id, request);
        let key = SlotKey::Pending(self.next_local_key);

        validate_slot(self.pairs(), key, &slot)?;

        self.next_local_key += 1;
        self.slots.push(TrackedSlot {
            key,
            slot,
            dirty: false,
        });
        Ok(key)
    }

    /// Apply field edits in place. `slot_type` is rederived from the start
    /// time; the patch's own value is ignored. Edits touching a time field
    /// are validated immediately and rejected without changing state; other
    /// edits (day moves included) are caught by the save-time sweep.
    pub fn update_slot(
        &mut self,
        key: SlotKey,
        patch: &UpdateSlotRequest,
    ) -> Result<(), AvailabilityError> {
        let idx = self.position(key).ok_or(AvailabilityError::SlotNotFound)?;

        let mut updated = self.slots[idx].slot.clone();
        let time_changed = patch.start_time.is_some() || patch.end_time.is_some();

        if let Some(day) = patch.day_of_week {
            updated.day_of_week = day;
        }
        if let Some(start) = patch.start_time {
            updated.start_time = Some(start);
        }
        if let Some(end) = patch.end_time {
            updated.end_time = Some(end);
        }
        if let Some(active) = patch.is_active {
            updated.is_active = active;
        }
        if let Some(ref address) = patch.address {
            updated.address = address.clone();
        }
        if let Some(kind) = patch.availability_type {
            updated.availability_type = kind;
            if kind == AvailabilityType::Online {
                updated.address.clear();
            }
        }
        updated.refresh_slot_type();

        if time_changed {
            validate_slot(self.pairs(), key, &updated)?;
        }

        let entry = &mut self.slots[idx];
        entry.slot = updated;
        if matches!(key, SlotKey::Persisted(_)) {
            entry.dirty = true;
        }
        Ok(())
    }

    /// Pending slots are dropped locally; persisted slots are deleted
    /// remotely first and removed only once the store confirms.
    pub async fn remove_slot(
        &mut self,
        key: SlotKey,
        auth_token: &str,
    ) -> Result<(), AvailabilityError> {
        let idx = self.position(key).ok_or(AvailabilityError::SlotNotFound)?;

        if let SlotKey::Persisted(id) = key {
            self.store.delete_availability(id, auth_token).await?;
        }

        self.slots.remove(idx);
        Ok(())
    }

    /// Push local changes: validate everything unsaved, bulk-create pending
    /// slots, patch each edited persisted slot, then refetch the full
    /// schedule. The whole save aborts on the first validation failure with
    /// nothing sent; a remote failure halts the remaining steps but leaves
    /// completed ones in place.
    pub async fn save(&mut self, auth_token: &str) -> Result<(), AvailabilityError> {
        for tracked in self.slots.iter().filter(|t| t.is_pending() || t.dirty) {
            validate_slot(self.pairs(), tracked.key, &tracked.slot)?;
        }

        let pending: Vec<Slot> = self
            .slots
            .iter()
            .filter(|t| t.is_pending())
            .map(|t| t.slot.clone())
            .collect();

        if !pending.is_empty() {
            debug!(
                "Saving {} pending slots for doctor {}",
                pending.len(),
                self.doctor_id
            );
            let created = self.store.create_availability(&pending, auth_token).await?;

            self.slots.retain(|t| !t.is_pending());
            for slot in created {
                match slot.id {
                    Some(id) => self.slots.push(TrackedSlot {
                        key: SlotKey::Persisted(id),
                        slot,
                        dirty: false,
                    }),
                    None => warn!("Bulk create returned a slot without an id"),
                }
            }
        }

        let edited: Vec<(usize, Uuid)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, t)| match (t.key, t.dirty) {
                (SlotKey::Persisted(id), true) => Some((idx, id)),
                _ => None,
            })
            .collect();

        for (idx, id) in edited {
            let patch = UpdateSlotRequest::from_slot(&self.slots[idx].slot);
            self.store.update_availability(&patch, id, auth_token).await?;
            self.slots[idx].dirty = false;
        }

        // Resynchronize with whatever the store actually accepted.
        let fetched = self.store.get_availability(self.doctor_id, auth_token).await?;
        self.replace_persisted(fetched);
        Ok(())
    }

    /// Flip a whole day on or off: optimistic local flip, one day-level
    /// remote call, inverse applied on failure. No overlap validation is
    /// needed since flipping flags cannot create a new conflict.
    pub async fn toggle_day(
        &mut self,
        day: DayOfWeek,
        active: bool,
        auth_token: &str,
    ) -> Result<(), AvailabilityError> {
        let previous: Vec<(SlotKey, bool)> = self
            .slots
            .iter()
            .filter(|t| t.slot.day_of_week == day)
            .map(|t| (t.key, t.slot.is_active))
            .collect();

        for tracked in self.slots.iter_mut().filter(|t| t.slot.day_of_week == day) {
            tracked.slot.is_active = active;
        }

        if let Err(err) = self.store.set_day_active(day, active, auth_token).await {
            warn!("Toggling {} failed, reverting local flags: {}", day, err);
            for (key, was_active) in previous {
                if let Some(idx) = self.position(key) {
                    self.slots[idx].slot.is_active = was_active;
                }
            }
            return Err(err.into());
        }

        self.load(auth_token).await
    }

    /// Apply the day-level flag to every weekday, then reload.
    pub async fn toggle_all_days(
        &mut self,
        active: bool,
        auth_token: &str,
    ) -> Result<(), AvailabilityError> {
        for day in DayOfWeek::ALL {
            self.store.set_day_active(day, active, auth_token).await?;
        }
        self.load(auth_token).await
    }

    /// Per-day rollup for one availability type: whether the day has any
    /// slots at all and whether any of them is active.
    pub fn day_summary(
        &self,
        availability_type: AvailabilityType,
    ) -> BTreeMap<DayOfWeek, DaySummary> {
        DayOfWeek::ALL
            .iter()
            .map(|&day| {
                let mut summary = DaySummary {
                    active: false,
                    has_slots: false,
                };
                for tracked in self.slots.iter().filter(|t| {
                    t.slot.day_of_week == day && t.slot.availability_type == availability_type
                }) {
                    summary.has_slots = true;
                    summary.active |= tracked.slot.is_active;
                }
                (day, summary)
            })
            .collect()
    }
}
