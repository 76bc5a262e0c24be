//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use seatwise_engine::{ExamEngine, InMemoryRoster, LifecycleConfig, ManualClock, NewSlot};
use seatwise_id::{ClassGroupId, HallId, RegisterNumber};
use seatwise_seating::{ClassGroup, Columns, Hall, Student};

pub struct Campus {
    pub roster: Arc<InMemoryRoster>,
    pub clock: Arc<ManualClock>,
    pub engine: ExamEngine,
    pub groups: Vec<ClassGroupId>,
    pub halls: Vec<HallId>,
}

impl Campus {
    /// A slot over every group and hall, starting at [`exam_start`] and running two hours.
    pub fn exam(&self, name: &str) -> NewSlot {
        NewSlot {
            name: name.to_string(),
            start_time: exam_start(),
            end_time: exam_start() + TimeDelta::hours(2),
            class_group_ids: self.groups.iter().copied().collect::<BTreeSet<_>>(),
            hall_ids: self.halls.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    /// Moves the clock to `minutes` relative to the exam start.
    pub fn at_minute(&self, minutes: i64) {
        self.clock.set(exam_start() + TimeDelta::minutes(minutes));
    }
}

pub fn exam_start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-02T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Builds a roster with `groups` as (name, student count) and `halls` as
/// (block, name, benches, columns), and an engine over it with a fixed seed.
pub async fn campus(groups: &[(&str, usize)], halls: &[(&str, &str, u32, Columns)]) -> Campus {
    let roster = Arc::new(InMemoryRoster::new());

    let mut group_ids = Vec::new();
    for (name, count) in groups {
        let group = ClassGroup::new(*name).unwrap();
        let group_id = group.id;
        roster.add_class_group(group).await.unwrap();
        group_ids.push(group_id);

        let branch = name.replace('-', "");
        for i in 1..=*count {
            let rn = RegisterNumber::parse(&format!("CEC{branch}{i:03}")).unwrap();
            let student = Student::new(rn, format!("{name} Student {i}"), group_id).unwrap();
            roster.add_student(student).await.unwrap();
        }
    }

    let mut hall_ids = Vec::new();
    for (block, name, capacity, columns) in halls {
        let hall = Hall::new(*name, *block, *capacity, *columns).unwrap();
        hall_ids.push(hall.id);
        roster.add_hall(hall).await.unwrap();
    }

    let clock = Arc::new(ManualClock::new(exam_start() - TimeDelta::hours(1)));
    let config = LifecycleConfig {
        allocation_seed: Some(7),
        ..LifecycleConfig::default()
    };
    let engine = ExamEngine::new(roster.clone(), clock.clone(), config);

    Campus {
        roster,
        clock,
        engine,
        groups: group_ids,
        halls: hall_ids,
    }
}
