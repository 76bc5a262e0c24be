//! Allocation and roster validation errors.

use thiserror::Error;

/// Allocation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// More students than the halls can hold even at two per bench.
    #[error("not enough capacity: {students} students for {benches} benches ({} seats at most)", .benches * 2)]
    Capacity { students: usize, benches: usize },
}

/// Roster records that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is blank.
    #[error("{0} cannot be blank")]
    Blank(&'static str),

    /// A hall was declared with no benches.
    #[error("hall capacity must be at least one bench")]
    ZeroCapacity,

    /// Bench columns outside the supported layouts.
    #[error("hall columns must be 2, 3 or 4, got {0}")]
    InvalidColumns(u8),
}
