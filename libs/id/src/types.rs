//! Typed ID definitions for roster and scheduling records.

use crate::define_id;

// =============================================================================
// Roster
// =============================================================================

define_id!(
    /// Identifies a student on the roster.
    StudentId,
    "stu"
);
define_id!(
    /// Identifies a class group (e.g. "24-CS"), the unit used for interleaving.
    ClassGroupId,
    "cg"
);
define_id!(
    /// Identifies an exam hall.
    HallId,
    "hall"
);

// =============================================================================
// Scheduling
// =============================================================================

define_id!(
    /// Identifies an exam slot.
    SlotId,
    "slot"
);

// =============================================================================
// Tests
// =============================================================================
