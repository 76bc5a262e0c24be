//! In-memory slot store.
//!
//! Each slot lives behind its own mutex so a check-and-set on one slot
//! (generation, a status step, an attendance write) never waits on
//! another. The map lock is only held long enough to look a slot up.

use std::collections::BTreeMap;
use std::sync::Arc;

use seatwise_id::SlotId;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::slot::{ExamSlot, SlotStatus};

/// Handle to one slot record.
pub(crate) type SharedSlot = Arc<Mutex<ExamSlot>>;

/// Number of slots in each lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub generated: usize,
    pub active: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.generated + self.active + self.completed
    }
}

/// Store of exam slots.
#[derive(Debug, Default)]
pub struct SlotStore {
    slots: RwLock<BTreeMap<SlotId, SharedSlot>>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slot. A slot with the same ID is replaced.
    pub async fn insert(&self, slot: ExamSlot) {
        let id = slot.id;
        info!(slot_id = %id, name = %slot.name, start_time = %slot.start_time, "Slot scheduled");
        self.slots
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(slot)));
    }

    /// Removes a slot and its plan. Returns the removed record.
    pub async fn delete(&self, id: SlotId) -> Option<ExamSlot> {
        let handle = self.slots.write().await.remove(&id)?;
        let slot = handle.lock().await.clone();
        info!(slot_id = %id, "Slot deleted");
        Some(slot)
    }

    /// Snapshot of one slot.
    pub async fn get(&self, id: SlotId) -> Option<ExamSlot> {
        let handle = self.handle(id).await?;
        let slot = handle.lock().await;
        Some(slot.clone())
    }

    /// Snapshot of every slot, ordered by ID.
    pub async fn list(&self) -> Vec<ExamSlot> {
        let mut slots = Vec::new();
        for (_, handle) in self.handles().await {
            slots.push(handle.lock().await.clone());
        }
        slots
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    pub async fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for slot in self.list().await {
            match slot.status {
                SlotStatus::Pending => counts.pending += 1,
                SlotStatus::Generated => counts.generated += 1,
                SlotStatus::Active => counts.active += 1,
                SlotStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }

    pub(crate) async fn handle(&self, id: SlotId) -> Option<SharedSlot> {
        self.slots.read().await.get(&id).cloned()
    }

    /// Handles to every slot; the map lock is released before returning.
    pub(crate) async fn handles(&self) -> Vec<(SlotId, SharedSlot)> {
        self.slots
            .read()
            .await
            .iter()
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .collect()
    }
}
