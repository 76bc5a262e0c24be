//! Exam slots and their lifecycle states.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use seatwise_id::{ClassGroupId, HallId, SlotId, StudentId};
use seatwise_seating::Seating;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes before start at which the seating plan is generated.
pub const GENERATION_LEAD_MINUTES: i64 = 3;

/// Minutes before start at which a generated plan becomes public.
pub const REVEAL_LEAD_MINUTES: i64 = 2;

/// Slot lifecycle state.
///
/// `Pending -> Generated -> Active -> Completed`; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotStatus {
    /// Waiting for the generation window; no plan yet.
    Pending,
    /// Plan generated, exam not started.
    Generated,
    /// Exam in progress.
    Active,
    /// Exam over.
    Completed,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Generated => "GENERATED",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors rejecting a slot before it enters the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot name cannot be blank")]
    BlankName,

    #[error("slot must end after it starts (start {start}, end {end})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("slot needs at least one class group")]
    NoClassGroups,

    #[error("slot needs at least one hall")]
    NoHalls,

    #[error("unknown class group: {0}")]
    UnknownClassGroup(ClassGroupId),

    #[error("unknown hall: {0}")]
    UnknownHall(HallId),
}

/// Request to schedule a new slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub class_group_ids: BTreeSet<ClassGroupId>,
    pub hall_ids: BTreeSet<HallId>,
}

impl NewSlot {
    /// Checks the request on its own; roster references are checked by the engine.
    pub fn validate(&self) -> Result<(), SlotError> {
        if self.name.trim().is_empty() {
            return Err(SlotError::BlankName);
        }
        if self.end_time <= self.start_time {
            return Err(SlotError::InvalidWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.class_group_ids.is_empty() {
            return Err(SlotError::NoClassGroups);
        }
        if self.hall_ids.is_empty() {
            return Err(SlotError::NoHalls);
        }
        Ok(())
    }
}

/// A scheduled exam and, once generated, its seating plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSlot {
    pub id: SlotId,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub class_group_ids: BTreeSet<ClassGroupId>,
    pub hall_ids: BTreeSet<HallId>,
    pub status: SlotStatus,
    pub seating_plan: Vec<Seating>,
    /// Generation attempts that failed on capacity.
    #[serde(default)]
    pub failed_generations: u32,
}

impl ExamSlot {
    /// Builds a pending slot from a validated request.
    pub fn from_request(request: NewSlot) -> Result<Self, SlotError> {
        request.validate()?;
        Ok(Self {
            id: SlotId::new(),
            name: request.name,
            start_time: request.start_time,
            end_time: request.end_time,
            class_group_ids: request.class_group_ids,
            hall_ids: request.hall_ids,
            status: SlotStatus::Pending,
            seating_plan: Vec::new(),
            failed_generations: 0,
        })
    }

    /// When the scheduler generates the plan.
    pub fn generation_time(&self) -> DateTime<Utc> {
        self.start_time - TimeDelta::minutes(GENERATION_LEAD_MINUTES)
    }

    /// When a generated plan becomes visible to students and invigilators.
    pub fn reveal_time(&self) -> DateTime<Utc> {
        self.start_time - TimeDelta::minutes(REVEAL_LEAD_MINUTES)
    }

    pub fn seat_of(&self, student_id: StudentId) -> Option<&Seating> {
        self.seating_plan.iter().find(|s| s.student_id == student_id)
    }

    pub(crate) fn seat_of_mut(&mut self, student_id: StudentId) -> Option<&mut Seating> {
        self.seating_plan
            .iter_mut()
            .find(|s| s.student_id == student_id)
    }
}
