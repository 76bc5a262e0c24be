//! Public visibility gate.
//!
//! Decides what an unauthenticated student or invigilator may see. The
//! gate looks only at slot times and whether a plan exists; it does not
//! wait for the scheduler to flip a slot to `ACTIVE`.

use chrono::{DateTime, Utc};
use seatwise_seating::{Attendance, Hall, SeatNumber, Student};
use serde::Serialize;

use crate::roster::Roster;
use crate::slot::{ExamSlot, SlotStatus};

/// What the public page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PublicStatus {
    /// No generated slot is upcoming or running.
    None,
    /// A slot is generated but not yet revealed; show a countdown.
    Upcoming,
    /// The plan is revealed and searchable.
    Active,
    /// The selected slot has ended.
    Completed,
}

/// The public view of the next relevant slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicView {
    pub status: PublicStatus,
    pub slot: Option<ExamSlot>,
    /// When the plan is revealed; set while the slot is upcoming.
    pub reveal_time: Option<DateTime<Utc>>,
}

impl PublicView {
    fn none() -> Self {
        Self {
            status: PublicStatus::None,
            slot: None,
            reveal_time: None,
        }
    }

    /// The slot whose plan may be shown, if revealed.
    pub fn revealed_slot(&self) -> Option<&ExamSlot> {
        match self.status {
            PublicStatus::Active => self.slot.as_ref(),
            _ => None,
        }
    }
}

/// Picks the next relevant slot and how much of it is visible at `now`.
///
/// Candidates are slots that have a plan (`status != PENDING`) and have not
/// ended; the earliest start wins, then the lower slot ID.
pub fn public_view<'a, I>(slots: I, now: DateTime<Utc>) -> PublicView
where
    I: IntoIterator<Item = &'a ExamSlot>,
{
    let selected = slots
        .into_iter()
        .filter(|slot| slot.end_time > now && slot.status != SlotStatus::Pending)
        .min_by_key(|slot| (slot.start_time, slot.id));

    let Some(slot) = selected else {
        return PublicView::none();
    };

    let reveal_time = slot.reveal_time();
    let (status, reveal_time) = if now < reveal_time {
        (PublicStatus::Upcoming, Some(reveal_time))
    } else if now < slot.end_time {
        (PublicStatus::Active, None)
    } else {
        (PublicStatus::Completed, None)
    };

    PublicView {
        status,
        slot: Some(slot.clone()),
        reveal_time,
    }
}

/// A student's seat as shown by the seat finder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatAssignment {
    pub student: Student,
    pub hall: Hall,
    pub seat_number: SeatNumber,
    pub attendance: Option<Attendance>,
}

/// Finds the seat of the student with `register_number` in `slot`.
///
/// `None` when the register number is unknown, the student has no seat in
/// this slot, or the hall is no longer on the roster.
pub async fn find_seat(
    roster: &dyn Roster,
    register_number: &str,
    slot: &ExamSlot,
) -> Option<SeatAssignment> {
    let student = roster.find_by_register_number(register_number).await?;
    let seat = slot.seat_of(student.id)?;
    let hall = roster.hall(seat.hall_id).await?;

    Some(SeatAssignment {
        seat_number: seat.seat_number,
        attendance: seat.attendance,
        student,
        hall,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::TimeDelta;
    use rstest::rstest;
    use seatwise_id::{ClassGroupId, HallId};

    use super::*;
    use crate::slot::NewSlot;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn slot(name: &str, start: DateTime<Utc>, status: SlotStatus) -> ExamSlot {
        let mut slot = ExamSlot::from_request(NewSlot {
            name: name.to_string(),
            start_time: start,
            end_time: start + TimeDelta::hours(2),
            class_group_ids: BTreeSet::from([ClassGroupId::new()]),
            hall_ids: BTreeSet::from([HallId::new()]),
        })
        .unwrap();
        slot.status = status;
        slot
    }

    // seconds relative to the 09:00 start; reveal at -120, end at +7200
    #[rstest]
    #[case(-3600, PublicStatus::Upcoming)]
    #[case(-121, PublicStatus::Upcoming)]
    #[case(-120, PublicStatus::Active)]
    #[case(0, PublicStatus::Active)]
    #[case(7199, PublicStatus::Active)]
    #[case(7200, PublicStatus::None)]
    fn test_reveal_timing(#[case] seconds: i64, #[case] expected: PublicStatus) {
        let slots = [slot("Maths", start(), SlotStatus::Generated)];
        let now = start() + TimeDelta::seconds(seconds);

        let view = public_view(&slots, now);

        assert_eq!(view.status, expected);
        if expected == PublicStatus::Upcoming {
            assert_eq!(view.reveal_time, Some(start() - TimeDelta::minutes(2)));
        }
    }

    #[test]
    fn test_pending_slots_are_never_public() {
        let slots = [slot("Maths", start(), SlotStatus::Pending)];
        let view = public_view(&slots, start());
        assert_eq!(view.status, PublicStatus::None);
        assert!(view.slot.is_none());
        assert!(view.revealed_slot().is_none());
    }

    #[test]
    fn test_earliest_start_wins() {
        let later = slot("Physics", start() + TimeDelta::hours(3), SlotStatus::Generated);
        let earlier = slot("Maths", start(), SlotStatus::Active);
        let slots = [later, earlier.clone()];

        let view = public_view(&slots, start() + TimeDelta::minutes(10));

        assert_eq!(view.status, PublicStatus::Active);
        assert_eq!(view.slot.as_ref().map(|s| s.id), Some(earlier.id));
        assert_eq!(view.revealed_slot().map(|s| s.id), Some(earlier.id));
    }

    #[test]
    fn test_no_slots() {
        let slots: Vec<ExamSlot> = Vec::new();
        let view = public_view(&slots, start());
        assert_eq!(view, PublicView::none());
    }
}
