//! Operator views over the roster and a slot's plan.

use std::collections::BTreeSet;

use seatwise_id::{ClassGroupId, HallId};
use seatwise_seating::{sort_fill_order, Attendance, Hall, SeatNumber, Student};
use serde::Serialize;
use tracing::debug;

use crate::roster::Roster;
use crate::slot::ExamSlot;

/// Students against seats for a prospective slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityPreview {
    pub students: usize,
    pub benches: usize,
}

impl CapacityPreview {
    /// Most students the selected halls can take, at two per bench.
    pub fn max_seats(&self) -> usize {
        self.benches * 2
    }

    pub fn is_sufficient(&self) -> bool {
        self.students <= self.max_seats()
    }

    /// Students that would be left without a seat.
    pub fn shortfall(&self) -> usize {
        self.students.saturating_sub(self.max_seats())
    }
}

/// Counts eligible students and benches for a class group / hall selection.
pub async fn capacity_preview(
    roster: &dyn Roster,
    class_group_ids: &BTreeSet<ClassGroupId>,
    hall_ids: &BTreeSet<HallId>,
) -> CapacityPreview {
    let students = roster.students_in(class_group_ids).await.len();
    let benches = roster
        .halls_in(hall_ids)
        .await
        .iter()
        .map(|h| h.capacity as usize)
        .sum();

    CapacityPreview { students, benches }
}

/// One occupied seat in a hall arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrangedSeat {
    pub seat_number: SeatNumber,
    pub student: Student,
    pub attendance: Option<Attendance>,
}

/// A hall and its seats, sorted by seat number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HallArrangement {
    pub hall: Hall,
    pub seats: Vec<ArrangedSeat>,
}

/// Groups a slot's plan by hall, halls in fill order.
///
/// Seats whose student has since left the roster are dropped.
pub async fn hall_arrangements(roster: &dyn Roster, slot: &ExamSlot) -> Vec<HallArrangement> {
    let mut halls = roster.halls_in(&slot.hall_ids).await;
    sort_fill_order(&mut halls);

    let mut arrangements = Vec::with_capacity(halls.len());
    for hall in halls {
        let mut seats = Vec::new();
        for seating in slot.seating_plan.iter().filter(|s| s.hall_id == hall.id) {
            let Some(student) = roster.student(seating.student_id).await else {
                debug!(student_id = %seating.student_id, "Seated student missing from roster");
                continue;
            };
            seats.push(ArrangedSeat {
                seat_number: seating.seat_number,
                student,
                attendance: seating.attendance,
            });
        }
        seats.sort_by_key(|s| s.seat_number);
        arrangements.push(HallArrangement { hall, seats });
    }
    arrangements
}
