//! Integration tests for the slot lifecycle.
//!
//! These drive `ExamEngine::tick` with a manual clock through:
//! 1. Generation three minutes before start
//! 2. Activation at start and completion at end
//! 3. Capacity failures and their retry

mod common;

use std::collections::{BTreeSet, HashSet};

use chrono::TimeDelta;
use common::{campus, exam_start};
use seatwise_engine::{SlotError, SlotStatus};
use seatwise_id::HallId;
use seatwise_seating::{AllocationError, Columns, SeatPosition};

#[tokio::test]
async fn test_slot_runs_through_lifecycle() {
    let campus = campus(
        &[("24-CS", 2), ("24-EC", 2)],
        &[("Main Block", "101", 4, Columns::Two)],
    )
    .await;
    let slot = campus.engine.create_slot(campus.exam("Maths")).await.unwrap();
    assert_eq!(slot.status, SlotStatus::Pending);

    campus.at_minute(-10);
    assert!(campus.engine.tick().await.is_quiet());

    campus.at_minute(-3);
    let report = campus.engine.tick().await;
    assert_eq!(report.transitions.len(), 1);
    assert_eq!(report.transitions[0].from, SlotStatus::Pending);
    assert_eq!(report.transitions[0].to, SlotStatus::Generated);

    let generated = campus.engine.slot(slot.id).await.unwrap();
    assert_eq!(generated.status, SlotStatus::Generated);
    let labels: BTreeSet<String> = generated
        .seating_plan
        .iter()
        .map(|s| s.seat_number.to_string())
        .collect();
    let expected: BTreeSet<String> = ["A1-1", "B1-1", "A2-1", "B2-1"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(labels, expected);
    assert!(generated
        .seating_plan
        .iter()
        .all(|s| s.seat_number.position() == SeatPosition::One));

    // further ticks before start leave the plan alone
    campus.at_minute(-1);
    assert!(campus.engine.tick().await.is_quiet());
    assert!(campus.engine.tick().await.is_quiet());
    let unchanged = campus.engine.slot(slot.id).await.unwrap();
    assert_eq!(unchanged.seating_plan, generated.seating_plan);

    campus.at_minute(0);
    campus.engine.tick().await;
    let active = campus.engine.slot(slot.id).await.unwrap();
    assert_eq!(active.status, SlotStatus::Active);
    assert_eq!(active.seating_plan, generated.seating_plan);

    campus.at_minute(120);
    campus.engine.tick().await;
    assert_eq!(
        campus.engine.slot(slot.id).await.unwrap().status,
        SlotStatus::Completed
    );

    campus.at_minute(10_000);
    assert!(campus.engine.tick().await.is_quiet());
    let counts = campus.engine.status_counts().await;
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.total(), 1);
}

#[tokio::test]
async fn test_capacity_failure_keeps_slot_pending_until_resolved() {
    let campus = campus(&[("22-EE", 21)], &[("EEE Block", "101", 10, Columns::Three)]).await;
    let slot = campus.engine.create_slot(campus.exam("Circuits")).await.unwrap();

    campus.at_minute(-3);
    for _ in 0..2 {
        let report = campus.engine.tick().await;
        assert!(report.transitions.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].error,
            AllocationError::Capacity {
                students: 21,
                benches: 10
            }
        );
        let current = campus.engine.slot(slot.id).await.unwrap();
        assert_eq!(current.status, SlotStatus::Pending);
        assert!(current.seating_plan.is_empty());
    }

    // one student withdraws; the next tick seats the rest two per bench
    let leaving = campus.roster.students().await[0].id;
    campus.roster.remove_student(leaving).await.unwrap();

    let report = campus.engine.tick().await;
    assert!(report.failures.is_empty());
    let generated = campus.engine.slot(slot.id).await.unwrap();
    assert_eq!(generated.status, SlotStatus::Generated);
    assert_eq!(generated.seating_plan.len(), 20);
    assert_eq!(
        generated
            .seating_plan
            .iter()
            .filter(|s| s.seat_number.position() == SeatPosition::Two)
            .count(),
        10
    );
}

#[tokio::test]
async fn test_sparse_split_across_halls() {
    let campus = campus(
        &[("23-AD", 5)],
        &[
            ("Main Block", "B", 10, Columns::Two),
            ("Main Block", "A", 10, Columns::Two),
        ],
    )
    .await;
    let slot = campus.engine.create_slot(campus.exam("Algebra")).await.unwrap();

    campus.at_minute(-3);
    campus.engine.tick().await;

    let plan = campus.engine.slot(slot.id).await.unwrap().seating_plan;
    let per_hall = |id: HallId| plan.iter().filter(|s| s.hall_id == id).count();
    // campus.halls is in insertion order: "B" then "A"; "A" fills first
    assert_eq!(per_hall(campus.halls[1]), 3);
    assert_eq!(per_hall(campus.halls[0]), 2);
    assert!(plan
        .iter()
        .all(|s| s.seat_number.position() == SeatPosition::One));
}

#[tokio::test]
async fn test_overdue_slot_catches_up_one_step_per_tick() {
    let campus = campus(&[("24-CS", 6)], &[("CS Block", "101", 25, Columns::Three)]).await;
    let slot = campus.engine.create_slot(campus.exam("Networks")).await.unwrap();

    // the engine was down through the generation window and the start
    campus.at_minute(30);

    campus.engine.tick().await;
    assert_eq!(
        campus.engine.slot(slot.id).await.unwrap().status,
        SlotStatus::Generated
    );

    campus.engine.tick().await;
    assert_eq!(
        campus.engine.slot(slot.id).await.unwrap().status,
        SlotStatus::Active
    );
}

#[tokio::test]
async fn test_slot_missed_entirely_catches_up_to_completed() {
    let campus = campus(&[("24-CS", 6)], &[("CS Block", "101", 25, Columns::Three)]).await;
    let slot = campus.engine.create_slot(campus.exam("Compilers")).await.unwrap();

    // the engine was down for the whole exam
    campus.at_minute(121);

    let mut seen = Vec::new();
    for _ in 0..5 {
        let report = campus.engine.tick().await;
        seen.extend(report.transitions.iter().map(|t| t.to));
    }
    assert_eq!(
        seen,
        vec![
            SlotStatus::Generated,
            SlotStatus::Active,
            SlotStatus::Completed
        ]
    );

    let current = campus.engine.slot(slot.id).await.unwrap();
    assert_eq!(current.status, SlotStatus::Completed);
    assert_eq!(current.seating_plan.len(), 6);
}

#[tokio::test]
async fn test_failed_slot_stops_retrying_after_it_ends() {
    let campus = campus(&[("22-EE", 21)], &[("EEE Block", "101", 10, Columns::Three)]).await;
    let slot = campus.engine.create_slot(campus.exam("Circuits")).await.unwrap();

    campus.at_minute(-3);
    assert_eq!(campus.engine.tick().await.failures.len(), 1);

    campus.at_minute(121);
    assert!(campus.engine.tick().await.is_quiet());

    let current = campus.engine.slot(slot.id).await.unwrap();
    assert_eq!(current.status, SlotStatus::Pending);
    assert_eq!(current.failed_generations, 1);
    assert!(current.seating_plan.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_ticks_generate_once() {
    let campus = campus(
        &[("24-CS", 35), ("24-EC", 35), ("23-AD", 35)],
        &[
            ("Main Block", "101", 30, Columns::Four),
            ("Main Block", "102", 30, Columns::Four),
        ],
    )
    .await;
    let slot = campus.engine.create_slot(campus.exam("Physics")).await.unwrap();
    campus.at_minute(-3);

    let (first, second) = tokio::join!(campus.engine.tick(), campus.engine.tick());

    assert_eq!(first.transitions.len() + second.transitions.len(), 1);
    let plan = campus.engine.slot(slot.id).await.unwrap().seating_plan;
    assert_eq!(plan.len(), 105);
    let students: HashSet<_> = plan.iter().map(|s| s.student_id).collect();
    assert_eq!(students.len(), 105);
    let seats: HashSet<_> = plan.iter().map(|s| (s.hall_id, s.seat_number)).collect();
    assert_eq!(seats.len(), 105);
}

#[tokio::test]
async fn test_independent_slots_in_one_tick() {
    let campus = campus(&[("24-CS", 30)], &[("Main Block", "101", 10, Columns::Two)]).await;

    // too many students for one hall at this slot...
    let crowded = campus.engine.create_slot(campus.exam("Crowded")).await.unwrap();

    // ...while a later slot in the same tick is simply not due yet
    let mut later = campus.exam("Later");
    later.start_time = exam_start() + TimeDelta::hours(3);
    later.end_time = exam_start() + TimeDelta::hours(4);
    let later = campus.engine.create_slot(later).await.unwrap();

    campus.at_minute(-3);
    let report = campus.engine.tick().await;
    assert_eq!(report.slots_evaluated, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].slot_id, crowded.id);
    assert_eq!(
        campus.engine.slot(later.id).await.unwrap().status,
        SlotStatus::Pending
    );
}

#[tokio::test]
async fn test_empty_store_ticks_quietly() {
    let campus = campus(&[], &[]).await;
    let report = campus.engine.tick().await;
    assert_eq!(report.slots_evaluated, 0);
    assert!(report.is_quiet());
}

#[tokio::test]
async fn test_create_slot_checks_roster() {
    let campus = campus(&[("24-CS", 2)], &[("Main Block", "101", 4, Columns::Two)]).await;

    let mut request = campus.exam("Ghost hall");
    let ghost = HallId::new();
    request.hall_ids.insert(ghost);
    assert_eq!(
        campus.engine.create_slot(request).await.unwrap_err(),
        SlotError::UnknownHall(ghost)
    );

    let mut request = campus.exam("Backwards");
    request.end_time = request.start_time - TimeDelta::minutes(1);
    assert!(matches!(
        campus.engine.create_slot(request).await.unwrap_err(),
        SlotError::InvalidWindow { .. }
    ));
    assert!(campus.engine.slots().await.is_empty());
}

#[tokio::test]
async fn test_deleted_slot_is_gone() {
    let campus = campus(&[("24-CS", 2)], &[("Main Block", "101", 4, Columns::Two)]).await;
    let slot = campus.engine.create_slot(campus.exam("Maths")).await.unwrap();

    assert!(campus.engine.delete_slot(slot.id).await.is_some());
    assert!(campus.engine.slot(slot.id).await.is_none());

    campus.at_minute(-3);
    assert_eq!(campus.engine.tick().await.slots_evaluated, 0);
}
