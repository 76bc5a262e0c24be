//! Roster records consumed by the allocator.

use seatwise_id::{ClassGroupId, HallId, RegisterNumber, StudentId};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A class group, e.g. "24-CS".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: ClassGroupId,
    pub name: String,
}

impl ClassGroup {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Blank("class group name"));
        }
        Ok(Self {
            id: ClassGroupId::new(),
            name,
        })
    }
}

/// A student on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub register_number: RegisterNumber,
    pub name: String,
    pub class_group_id: ClassGroupId,
}

impl Student {
    pub fn new(
        register_number: RegisterNumber,
        name: impl Into<String>,
        class_group_id: ClassGroupId,
    ) -> Result<Self, ValidationError> {
        let student = Self {
            id: StudentId::new(),
            register_number,
            name: name.into(),
            class_group_id,
        };
        student.validate()?;
        Ok(student)
    }

    /// Checks fields that deserialization alone does not enforce.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Blank("student name"));
        }
        Ok(())
    }
}

/// Number of bench columns in a hall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Columns {
    Two,
    Three,
    Four,
}

impl Columns {
    pub const fn get(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

impl TryFrom<u8> for Columns {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(ValidationError::InvalidColumns(other)),
        }
    }
}

impl From<Columns> for u8 {
    fn from(value: Columns) -> Self {
        value.get() as u8
    }
}

/// An exam hall: a grid of `capacity` benches laid out in `columns` columns.
///
/// Bench `b` (1-based) sits in row `(b - 1) / columns + 1` and column
/// `(b - 1) % columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hall {
    pub id: HallId,
    pub name: String,
    pub block: String,
    /// Number of benches.
    pub capacity: u32,
    pub columns: Columns,
}

impl Hall {
    pub fn new(
        name: impl Into<String>,
        block: impl Into<String>,
        capacity: u32,
        columns: Columns,
    ) -> Result<Self, ValidationError> {
        let hall = Self {
            id: HallId::new(),
            name: name.into(),
            block: block.into(),
            capacity,
            columns,
        };
        hall.validate()?;
        Ok(hall)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Blank("hall name"));
        }
        if self.block.trim().is_empty() {
            return Err(ValidationError::Blank("hall block"));
        }
        if self.capacity == 0 {
            return Err(ValidationError::ZeroCapacity);
        }
        Ok(())
    }

    /// Most students the hall can take, at two per bench.
    pub fn max_seats(&self) -> usize {
        self.capacity as usize * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hall_rejects_zero_capacity() {
        assert_eq!(
            Hall::new("101", "Main Block", 0, Columns::Two).unwrap_err(),
            ValidationError::ZeroCapacity
        );
    }

    #[test]
    fn test_hall_rejects_blank_block() {
        assert_eq!(
            Hall::new("101", " ", 10, Columns::Two).unwrap_err(),
            ValidationError::Blank("hall block")
        );
    }

    #[test]
    fn test_columns_from_wire() {
        assert_eq!(Columns::try_from(3).unwrap(), Columns::Three);
        assert_eq!(
            Columns::try_from(5).unwrap_err(),
            ValidationError::InvalidColumns(5)
        );

        let hall: Result<Hall, _> = serde_json::from_value(serde_json::json!({
            "id": HallId::new(),
            "name": "201",
            "block": "Main Block",
            "capacity": 40,
            "columns": 6,
        }));
        assert!(hall.is_err());
    }

    #[test]
    fn test_student_requires_name() {
        let rn = RegisterNumber::parse("CEC24CS001").unwrap();
        assert_eq!(
            Student::new(rn, "", ClassGroupId::new()).unwrap_err(),
            ValidationError::Blank("student name")
        );
    }
}
