//! Engine facade wiring the slot store, roster, lifecycle and ledger together.

use std::collections::BTreeSet;
use std::sync::Arc;

use seatwise_id::{ClassGroupId, HallId, SlotId, StudentId};
use seatwise_seating::Attendance;

use crate::arrangement::{self, CapacityPreview, HallArrangement};
use crate::attendance::{AttendanceError, AttendanceLedger, AttendanceSummary};
use crate::clock::Clock;
use crate::lifecycle::{LifecycleConfig, SlotLifecycle, TickReport};
use crate::roster::Roster;
use crate::slot::{ExamSlot, NewSlot, SlotError};
use crate::store::{SlotStore, StatusCounts};
use crate::visibility::{self, PublicView, SeatAssignment};
use crate::worker::LifecycleWorker;

/// The seating engine.
pub struct ExamEngine {
    roster: Arc<dyn Roster>,
    store: Arc<SlotStore>,
    lifecycle: Arc<SlotLifecycle>,
    ledger: AttendanceLedger,
    clock: Arc<dyn Clock>,
    config: LifecycleConfig,
}

impl ExamEngine {
    pub fn new(roster: Arc<dyn Roster>, clock: Arc<dyn Clock>, config: LifecycleConfig) -> Self {
        let store = Arc::new(SlotStore::new());
        let lifecycle = Arc::new(SlotLifecycle::new(
            Arc::clone(&store),
            Arc::clone(&roster),
            &config,
        ));
        let ledger = AttendanceLedger::new(Arc::clone(&store), Arc::clone(&roster));

        Self {
            roster,
            store,
            lifecycle,
            ledger,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &Arc<SlotStore> {
        &self.store
    }

    /// A background worker ticking this engine's lifecycle.
    pub fn worker(&self) -> LifecycleWorker {
        LifecycleWorker::new(
            Arc::clone(&self.lifecycle),
            Arc::clone(&self.clock),
            self.config.tick_interval,
        )
    }

    /// Schedules a slot after checking it against the roster.
    pub async fn create_slot(&self, request: NewSlot) -> Result<ExamSlot, SlotError> {
        request.validate()?;
        for id in &request.class_group_ids {
            if self.roster.class_group(*id).await.is_none() {
                return Err(SlotError::UnknownClassGroup(*id));
            }
        }
        for id in &request.hall_ids {
            if self.roster.hall(*id).await.is_none() {
                return Err(SlotError::UnknownHall(*id));
            }
        }

        let slot = ExamSlot::from_request(request)?;
        self.store.insert(slot.clone()).await;
        Ok(slot)
    }

    pub async fn delete_slot(&self, id: SlotId) -> Option<ExamSlot> {
        self.store.delete(id).await
    }

    pub async fn slot(&self, id: SlotId) -> Option<ExamSlot> {
        self.store.get(id).await
    }

    pub async fn slots(&self) -> Vec<ExamSlot> {
        self.store.list().await
    }

    pub async fn status_counts(&self) -> StatusCounts {
        self.store.status_counts().await
    }

    /// Runs one lifecycle tick at the clock's current time.
    pub async fn tick(&self) -> TickReport {
        self.lifecycle.tick(self.clock.now()).await
    }

    pub async fn public_view(&self) -> PublicView {
        let slots = self.store.list().await;
        visibility::public_view(&slots, self.clock.now())
    }

    /// Seat lookup for any slot, for operators.
    pub async fn find_seat(&self, register_number: &str, slot_id: SlotId) -> Option<SeatAssignment> {
        let slot = self.store.get(slot_id).await?;
        visibility::find_seat(self.roster.as_ref(), register_number, &slot).await
    }

    /// Seat lookup for the public: only in the currently revealed slot.
    pub async fn find_public_seat(&self, register_number: &str) -> Option<SeatAssignment> {
        let view = self.public_view().await;
        let slot = view.revealed_slot()?;
        visibility::find_seat(self.roster.as_ref(), register_number, slot).await
    }

    pub async fn mark_attendance(
        &self,
        slot_id: SlotId,
        student_id: StudentId,
        status: Attendance,
    ) -> Result<(), AttendanceError> {
        self.ledger.mark(slot_id, student_id, status).await
    }

    pub async fn attendance_summary(
        &self,
        slot_id: SlotId,
    ) -> Result<AttendanceSummary, AttendanceError> {
        self.ledger.summary(slot_id).await
    }

    pub async fn hall_attendance_summary(
        &self,
        slot_id: SlotId,
        hall_id: HallId,
    ) -> Result<AttendanceSummary, AttendanceError> {
        self.ledger.hall_summary(slot_id, hall_id).await
    }

    pub async fn hall_arrangements(&self, slot_id: SlotId) -> Option<Vec<HallArrangement>> {
        let slot = self.store.get(slot_id).await?;
        Some(arrangement::hall_arrangements(self.roster.as_ref(), &slot).await)
    }

    pub async fn capacity_preview(
        &self,
        class_group_ids: &BTreeSet<ClassGroupId>,
        hall_ids: &BTreeSet<HallId>,
    ) -> CapacityPreview {
        arrangement::capacity_preview(self.roster.as_ref(), class_group_ids, hall_ids).await
    }
}
