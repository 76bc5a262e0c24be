//! Attendance ledger: marks students present or absent against a slot's plan.

use std::sync::Arc;

use seatwise_id::{HallId, RegisterNumber, SlotId, StudentId};
use seatwise_seating::{Attendance, Seating};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::roster::Roster;
use crate::store::SlotStore;

/// Attendance lookups that found nothing to act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    #[error("slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("student {student_id} has no seat in slot {slot_id}")]
    NotInPlan {
        slot_id: SlotId,
        student_id: StudentId,
    },
}

/// Attendance totals for a slot or one of its halls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub unmarked: usize,
    /// Register numbers of students marked absent, sorted.
    ///
    /// Students since removed from the roster still count in `absent` but
    /// have no register number to list, so this can be shorter.
    pub absentees: Vec<RegisterNumber>,
}

impl AttendanceSummary {
    /// Share of seated students marked present, rounded to a whole percent.
    pub fn present_percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let percent = (self.present as f64 / self.total as f64 * 100.0).round();
        Some(percent as u32)
    }
}

/// Reads and writes per-seat attendance.
pub struct AttendanceLedger {
    store: Arc<SlotStore>,
    roster: Arc<dyn Roster>,
}

impl AttendanceLedger {
    pub fn new(store: Arc<SlotStore>, roster: Arc<dyn Roster>) -> Self {
        Self { store, roster }
    }

    /// Records attendance for a seated student. Last write wins.
    pub async fn mark(
        &self,
        slot_id: SlotId,
        student_id: StudentId,
        status: Attendance,
    ) -> Result<(), AttendanceError> {
        let handle = self
            .store
            .handle(slot_id)
            .await
            .ok_or(AttendanceError::SlotNotFound(slot_id))?;

        let mut slot = handle.lock().await;
        let seat = slot
            .seat_of_mut(student_id)
            .ok_or(AttendanceError::NotInPlan {
                slot_id,
                student_id,
            })?;
        seat.attendance = Some(status);

        debug!(slot_id = %slot_id, student_id = %student_id, attendance = ?status, "Attendance marked");
        Ok(())
    }

    /// Totals for the whole slot.
    pub async fn summary(&self, slot_id: SlotId) -> Result<AttendanceSummary, AttendanceError> {
        self.summarize(slot_id, None).await
    }

    /// Totals for one hall of the slot.
    pub async fn hall_summary(
        &self,
        slot_id: SlotId,
        hall_id: HallId,
    ) -> Result<AttendanceSummary, AttendanceError> {
        self.summarize(slot_id, Some(hall_id)).await
    }

    async fn summarize(
        &self,
        slot_id: SlotId,
        hall_id: Option<HallId>,
    ) -> Result<AttendanceSummary, AttendanceError> {
        let slot = self
            .store
            .get(slot_id)
            .await
            .ok_or(AttendanceError::SlotNotFound(slot_id))?;

        let seats: Vec<&Seating> = slot
            .seating_plan
            .iter()
            .filter(|s| hall_id.is_none_or(|id| s.hall_id == id))
            .collect();

        let mut summary = AttendanceSummary {
            total: seats.len(),
            ..AttendanceSummary::default()
        };
        for seat in seats {
            match seat.attendance {
                Some(Attendance::Present) => summary.present += 1,
                Some(Attendance::Absent) => {
                    summary.absent += 1;
                    match self.roster.student(seat.student_id).await {
                        Some(student) => summary.absentees.push(student.register_number),
                        None => {
                            debug!(student_id = %seat.student_id, "Absent student missing from roster")
                        }
                    }
                }
                None => summary.unmarked += 1,
            }
        }
        summary.absentees.sort();
        Ok(summary)
    }
}
