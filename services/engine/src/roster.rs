//! Roster and resource store.
//!
//! The lifecycle only reads the roster through [`Roster`]; [`InMemoryRoster`]
//! is the store the engine ships with, including the admin-side edits
//! (adding students and halls) that keep it consistent.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use seatwise_id::{ClassGroupId, HallId, RegisterNumber, StudentId};
use seatwise_seating::{ClassGroup, Hall, Student, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Errors from roster edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("register number already in use: {0}")]
    DuplicateRegisterNumber(RegisterNumber),

    #[error("unknown class group: {0}")]
    UnknownClassGroup(ClassGroupId),

    #[error("student not found: {0}")]
    StudentNotFound(StudentId),

    #[error("hall not found: {0}")]
    HallNotFound(HallId),
}

/// Read access to students, class groups, and halls.
#[async_trait]
pub trait Roster: Send + Sync {
    /// Students belonging to any of `groups`.
    async fn students_in(&self, groups: &BTreeSet<ClassGroupId>) -> Vec<Student>;

    /// Halls among `halls`. Unknown IDs are skipped.
    async fn halls_in(&self, halls: &BTreeSet<HallId>) -> Vec<Hall>;

    /// Looks a student up by register number, ignoring case.
    async fn find_by_register_number(&self, register_number: &str) -> Option<Student>;

    async fn student(&self, id: StudentId) -> Option<Student>;

    async fn hall(&self, id: HallId) -> Option<Hall>;

    async fn class_group(&self, id: ClassGroupId) -> Option<ClassGroup>;
}

/// Serializable roster contents, used to seed the store at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub class_groups: Vec<ClassGroup>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub halls: Vec<Hall>,
}

#[derive(Debug, Default)]
struct RosterState {
    class_groups: BTreeMap<ClassGroupId, ClassGroup>,
    students: BTreeMap<StudentId, Student>,
    halls: BTreeMap<HallId, Hall>,
}

impl RosterState {
    fn check_student(&self, student: &Student) -> Result<(), RosterError> {
        student.validate()?;
        if !self.class_groups.contains_key(&student.class_group_id) {
            return Err(RosterError::UnknownClassGroup(student.class_group_id));
        }
        let taken = self
            .students
            .values()
            .any(|s| s.id != student.id && s.register_number == student.register_number);
        if taken {
            return Err(RosterError::DuplicateRegisterNumber(
                student.register_number.clone(),
            ));
        }
        Ok(())
    }
}

/// Roster held in memory.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    state: RwLock<RosterState>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from a snapshot, validating every record.
    pub async fn from_snapshot(snapshot: RosterSnapshot) -> Result<Self, RosterError> {
        let roster = Self::new();
        for group in snapshot.class_groups {
            roster.add_class_group(group).await?;
        }
        for hall in snapshot.halls {
            roster.add_hall(hall).await?;
        }
        for student in snapshot.students {
            roster.add_student(student).await?;
        }
        Ok(roster)
    }

    pub async fn snapshot(&self) -> RosterSnapshot {
        let state = self.state.read().await;
        RosterSnapshot {
            class_groups: state.class_groups.values().cloned().collect(),
            students: state.students.values().cloned().collect(),
            halls: state.halls.values().cloned().collect(),
        }
    }

    pub async fn add_class_group(&self, group: ClassGroup) -> Result<(), RosterError> {
        if group.name.trim().is_empty() {
            return Err(ValidationError::Blank("class group name").into());
        }
        debug!(class_group_id = %group.id, name = %group.name, "Class group added");
        self.state
            .write()
            .await
            .class_groups
            .insert(group.id, group);
        Ok(())
    }

    pub async fn class_groups(&self) -> Vec<ClassGroup> {
        self.state.read().await.class_groups.values().cloned().collect()
    }

    pub async fn add_student(&self, student: Student) -> Result<(), RosterError> {
        let mut state = self.state.write().await;
        state.check_student(&student)?;
        debug!(student_id = %student.id, register_number = %student.register_number, "Student added");
        state.students.insert(student.id, student);
        Ok(())
    }

    /// Replaces an existing student record.
    pub async fn update_student(&self, student: Student) -> Result<(), RosterError> {
        let mut state = self.state.write().await;
        if !state.students.contains_key(&student.id) {
            return Err(RosterError::StudentNotFound(student.id));
        }
        state.check_student(&student)?;
        state.students.insert(student.id, student);
        Ok(())
    }

    pub async fn remove_student(&self, id: StudentId) -> Option<Student> {
        let removed = self.state.write().await.students.remove(&id);
        if removed.is_some() {
            info!(student_id = %id, "Student removed");
        }
        removed
    }

    pub async fn students(&self) -> Vec<Student> {
        self.state.read().await.students.values().cloned().collect()
    }

    pub async fn add_hall(&self, hall: Hall) -> Result<(), RosterError> {
        hall.validate()?;
        debug!(hall_id = %hall.id, block = %hall.block, name = %hall.name, "Hall added");
        self.state.write().await.halls.insert(hall.id, hall);
        Ok(())
    }

    /// Replaces an existing hall record.
    pub async fn update_hall(&self, hall: Hall) -> Result<(), RosterError> {
        hall.validate()?;
        let mut state = self.state.write().await;
        if !state.halls.contains_key(&hall.id) {
            return Err(RosterError::HallNotFound(hall.id));
        }
        state.halls.insert(hall.id, hall);
        Ok(())
    }

    pub async fn remove_hall(&self, id: HallId) -> Option<Hall> {
        let removed = self.state.write().await.halls.remove(&id);
        if removed.is_some() {
            info!(hall_id = %id, "Hall removed");
        }
        removed
    }

    pub async fn halls(&self) -> Vec<Hall> {
        self.state.read().await.halls.values().cloned().collect()
    }
}

#[async_trait]
impl Roster for InMemoryRoster {
    async fn students_in(&self, groups: &BTreeSet<ClassGroupId>) -> Vec<Student> {
        self.state
            .read()
            .await
            .students
            .values()
            .filter(|s| groups.contains(&s.class_group_id))
            .cloned()
            .collect()
    }

    async fn halls_in(&self, halls: &BTreeSet<HallId>) -> Vec<Hall> {
        let state = self.state.read().await;
        halls
            .iter()
            .filter_map(|id| state.halls.get(id).cloned())
            .collect()
    }

    async fn find_by_register_number(&self, register_number: &str) -> Option<Student> {
        let wanted = RegisterNumber::parse(register_number).ok()?;
        self.state
            .read()
            .await
            .students
            .values()
            .find(|s| s.register_number == wanted)
            .cloned()
    }

    async fn student(&self, id: StudentId) -> Option<Student> {
        self.state.read().await.students.get(&id).cloned()
    }

    async fn hall(&self, id: HallId) -> Option<Hall> {
        self.state.read().await.halls.get(&id).cloned()
    }

    async fn class_group(&self, id: ClassGroupId) -> Option<ClassGroup> {
        self.state.read().await.class_groups.get(&id).cloned()
    }
}
