//! seatwise engine
//!
//! Seats students in exam halls and runs each exam slot through its
//! lifecycle: generate the plan shortly before the exam, reveal it to
//! students, then track attendance while the exam runs.
//!
//! ## Architecture
//!
//! ```text
//! LifecycleWorker (interval loop, watch shutdown)
//! └── SlotLifecycle::tick(now)
//!     ├── SlotStore        (per-slot mutex; check-and-set transitions)
//!     ├── Roster           (students, class groups, halls)
//!     └── allocate()       (seatwise-seating, on the blocking pool)
//!
//! AttendanceLedger  -> SlotStore  (per-seat attendance writes)
//! public_view()     -> slot snapshots (what students may see)
//! ```
//!
//! [`ExamEngine`] wires these together for an application shell.
//!
//! ## Modules
//!
//! - `slot`: exam slots, lifecycle states, creation checks
//! - `store`: in-memory slot store
//! - `roster`: roster trait and in-memory roster
//! - `lifecycle`: the tick state machine
//! - `worker`: periodic tick driver
//! - `attendance`: attendance ledger and summaries
//! - `visibility`: public view and seat finder
//! - `arrangement`: capacity preview and hall-by-hall plan views

pub mod arrangement;
pub mod attendance;
pub mod clock;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod roster;
pub mod slot;
pub mod store;
pub mod visibility;
pub mod worker;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::ExamEngine;
pub use lifecycle::{LifecycleConfig, SlotLifecycle, TickReport};
pub use roster::{InMemoryRoster, Roster, RosterError, RosterSnapshot};
pub use slot::{ExamSlot, NewSlot, SlotError, SlotStatus};
pub use visibility::{PublicStatus, PublicView, SeatAssignment};
