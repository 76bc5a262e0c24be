//! # seatwise-id
//!
//! Typed identifiers for the records the seating engine references.
//!
//! ## ID Format
//!
//! Every record ID uses a prefixed format: `{prefix}_{ulid}`
//!
//! Examples:
//! - `stu_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `hall_01HV4Z3MXNKPQR9HSTZ7WCLD4E`
//! - `slot_01HV4Z4NYPLTRS0JTUA8XDME5F`
//!
//! The prefix keeps a hall ID from being passed where a student ID is
//! expected, and the ULID keeps IDs sortable by creation time.
//!
//! Students are also addressed by their [`RegisterNumber`], the
//! institution-issued code students type in to find their seat. It is
//! matched case-insensitively.

mod error;
mod macros;
mod register;
mod types;

pub use error::IdError;
pub use register::RegisterNumber;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
