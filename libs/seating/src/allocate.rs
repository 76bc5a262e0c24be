//! The seat allocation engine.
//!
//! [`allocate`] is a pure function of the roster, the halls, and the RNG
//! state. The caller pre-filters students to the slot's class groups and
//! halls to the slot's halls; [`sort_fill_order`] puts halls in the order
//! they are filled.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use seatwise_id::ClassGroupId;
use tracing::debug;

use crate::error::AllocationError;
use crate::roster::{Hall, Student};
use crate::seat::{SeatNumber, SeatPosition, Seating};

/// How benches are filled for a given load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatingMode {
    /// At least two benches per student: one student per bench, spread out.
    Sparse,
    /// One student per bench, benches filled in order.
    Single,
    /// Up to two students per bench.
    Double,
}

impl SeatingMode {
    /// Picks the mode for `students` over `benches`.
    ///
    /// An empty roster is seated densely (and trivially).
    pub fn select(students: usize, benches: usize) -> Result<Self, AllocationError> {
        if students > 0 && benches >= students * 2 {
            Ok(Self::Sparse)
        } else if students <= benches {
            Ok(Self::Single)
        } else if students <= benches * 2 {
            Ok(Self::Double)
        } else {
            Err(AllocationError::Capacity { students, benches })
        }
    }
}

/// A generated plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub mode: SeatingMode,
    pub seats: Vec<Seating>,
}

/// Sorts halls into fill order: by block, then name.
///
/// Hall ID breaks remaining ties so the order never depends on input order.
pub fn sort_fill_order(halls: &mut [Hall]) {
    halls.sort_by(|a, b| {
        a.block
            .cmp(&b.block)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Seats `students` across `halls`, which must already be in fill order.
///
/// Fails with [`AllocationError::Capacity`] when the students do not fit at
/// two per bench; no partial plan is produced.
pub fn allocate<R>(
    students: &[Student],
    halls: &[Hall],
    rng: &mut R,
) -> Result<Allocation, AllocationError>
where
    R: Rng + ?Sized,
{
    let total_benches: usize = halls.iter().map(|h| h.capacity as usize).sum();
    let mode = SeatingMode::select(students.len(), total_benches)?;

    let sequence = interleave(students, rng);

    let seats = match mode {
        SeatingMode::Sparse => place_sparse(&sequence, halls, total_benches),
        SeatingMode::Single | SeatingMode::Double => place_dense(&sequence, halls, mode),
    };

    debug!(
        ?mode,
        students = students.len(),
        benches = total_benches,
        halls = halls.len(),
        "Seating plan allocated"
    );

    Ok(Allocation { mode, seats })
}

/// Shuffles each class group independently, then draws one student per
/// group per round until every group is drained.
///
/// Groups take their turn in order of first appearance in `students`.
fn interleave<'a, R>(students: &'a [Student], rng: &mut R) -> Vec<&'a Student>
where
    R: Rng + ?Sized,
{
    let mut groups: Vec<Vec<&Student>> = Vec::new();
    let mut index: HashMap<ClassGroupId, usize> = HashMap::new();

    for student in students {
        let slot = *index.entry(student.class_group_id).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(student);
    }

    for group in &mut groups {
        group.shuffle(rng);
    }

    let rounds = groups.iter().map(Vec::len).max().unwrap_or(0);
    let mut sequence = Vec::with_capacity(students.len());
    for round in 0..rounds {
        sequence.extend(groups.iter().filter_map(|group| group.get(round).copied()));
    }
    sequence
}

/// One student per bench, each hall taking its proportional share and the
/// rounding remainder handed out one per hall in fill order.
fn place_sparse(sequence: &[&Student], halls: &[Hall], total_benches: usize) -> Vec<Seating> {
    let total_students = sequence.len();
    let mut pool = sequence.iter().copied();

    let mut assigned: Vec<Vec<&Student>> = halls
        .iter()
        .map(|hall| {
            let quota = hall.capacity as usize * total_students / total_benches;
            pool.by_ref().take(quota).collect()
        })
        .collect();

    for (turn, student) in pool.enumerate() {
        assigned[turn % halls.len()].push(student);
    }

    let mut seats = Vec::with_capacity(total_students);
    for (hall, students) in halls.iter().zip(&assigned) {
        let n = students.len();
        let capacity = hall.capacity as usize;
        for (i, student) in students.iter().enumerate() {
            // floor(i * capacity / n) spreads n students evenly over the benches
            let bench = (i * capacity / n) as u32 + 1;
            seats.push(Seating::new(
                student.id,
                hall.id,
                SeatNumber::for_bench(bench, hall.columns, SeatPosition::One),
            ));
        }
    }
    seats
}

/// Fills halls in order: position 1 of every bench first, then position 2
/// when double seating.
fn place_dense(sequence: &[&Student], halls: &[Hall], mode: SeatingMode) -> Vec<Seating> {
    let per_bench = if mode == SeatingMode::Double { 2 } else { 1 };
    let mut pool = sequence.iter().copied().peekable();
    let mut seats = Vec::with_capacity(sequence.len());

    for hall in halls {
        if pool.peek().is_none() {
            break;
        }

        let capacity = hall.capacity as usize;
        let students: Vec<&Student> = pool.by_ref().take(capacity * per_bench).collect();
        let (front, back) = students.split_at(students.len().min(capacity));

        for (position, placed) in [(SeatPosition::One, front), (SeatPosition::Two, back)] {
            for (offset, student) in placed.iter().enumerate() {
                let bench = offset as u32 + 1;
                seats.push(Seating::new(
                    student.id,
                    hall.id,
                    SeatNumber::for_bench(bench, hall.columns, position),
                ));
            }
        }
    }
    seats
}
