//! Seat labels and seating records.

use std::fmt;
use std::str::FromStr;

use seatwise_id::{HallId, StudentId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::Columns;

/// Which half of a bench a student occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeatPosition {
    One,
    Two,
}

impl SeatPosition {
    pub const fn get(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// A seat label such as `B3-2`: column letter, row, then bench position.
///
/// Ordering is column, row, position, which is how the labels read when
/// sorted naturally (`A2-1` before `A10-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatNumber {
    column: u8,
    row: u32,
    position: SeatPosition,
}

impl SeatNumber {
    /// Label for a 1-based bench number in a hall with the given columns.
    ///
    /// # Panics
    ///
    /// Panics if `bench` is zero.
    pub fn for_bench(bench: u32, columns: Columns, position: SeatPosition) -> Self {
        assert!(bench > 0, "bench numbers start at 1");
        let index = bench - 1;
        Self {
            column: (index % columns.get()) as u8,
            row: index / columns.get() + 1,
            position,
        }
    }

    /// Column letter (`A`, `B`, ...).
    pub fn column(&self) -> char {
        char::from(b'A' + self.column)
    }

    /// 1-based row.
    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn position(&self) -> SeatPosition {
        self.position
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", self.column(), self.row, self.position.get())
    }
}

/// Errors parsing a seat label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid seat number '{0}': expected <column><row>-<1|2>")]
pub struct SeatParseError(String);

impl FromStr for SeatNumber {
    type Err = SeatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeatParseError(s.to_string());

        let mut chars = s.chars();
        let column = match chars.next() {
            Some(c @ 'A'..='Z') => c as u8 - b'A',
            _ => return Err(invalid()),
        };
        let (row, position) = chars.as_str().split_once('-').ok_or_else(invalid)?;
        if !row.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row: u32 = row.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        let position = match position {
            "1" => SeatPosition::One,
            "2" => SeatPosition::Two,
            _ => return Err(invalid()),
        };

        Ok(Self {
            column,
            row,
            position,
        })
    }
}

impl Serialize for SeatNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Attendance recorded by an invigilator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Attendance {
    Present,
    Absent,
}

/// One student's seat in a slot's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    pub student_id: StudentId,
    pub hall_id: HallId,
    pub seat_number: SeatNumber,
    /// Unset until the invigilator marks the student.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Attendance>,
}

impl Seating {
    pub fn new(student_id: StudentId, hall_id: HallId, seat_number: SeatNumber) -> Self {
        Self {
            student_id,
            hall_id,
            seat_number,
            attendance: None,
        }
    }
}
