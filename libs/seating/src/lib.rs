//! Seat allocation primitives.
//!
//! This library turns a roster of students and a set of halls into a
//! conflict-free seating plan. Key concepts:
//!
//! - **Bench**: a seating unit in a hall holding one or two students.
//! - **Interleaving**: students are shuffled within their class group and
//!   then drawn round-robin across groups, so neighbours rarely share a group.
//! - **Mode**: sparse (one student per bench, spread across the hall) when
//!   benches are plentiful, dense (single or double seating) otherwise.
//!
//! # Invariants
//!
//! - No two seats in a plan share `(hall_id, seat_number)`
//! - A successful plan seats every student exactly once
//! - A hall never holds more than two students per bench
//! - Allocation is deterministic given the same inputs and RNG state

mod allocate;
mod error;
mod roster;
mod seat;

pub use allocate::{allocate, sort_fill_order, Allocation, SeatingMode};
pub use error::{AllocationError, ValidationError};
pub use roster::{ClassGroup, Columns, Hall, Student};
pub use seat::{Attendance, SeatNumber, SeatParseError, SeatPosition, Seating};
