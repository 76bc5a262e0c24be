//! Slot lifecycle scheduler.
//!
//! Each [`SlotLifecycle::tick`] sweeps every slot in the store and takes at
//! most one step per slot:
//!
//! ```text
//! PENDING   --(now >= start - 3min)--> allocate --ok--> GENERATED
//!                                               --capacity error--> PENDING (retried)
//! GENERATED --(now >= start)--> ACTIVE
//! ACTIVE    --(now >= end)--> COMPLETED
//! ```
//!
//! The step is decided and applied while holding the slot's lock, so a
//! slot is never generated twice even when ticks overlap. Slots are
//! evaluated on separate tasks and allocation runs on the blocking pool,
//! so one large roster does not hold up the rest of the sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seatwise_id::SlotId;
use seatwise_seating::{allocate, sort_fill_order, AllocationError, Seating};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::roster::Roster;
use crate::slot::{ExamSlot, SlotStatus};
use crate::store::{SharedSlot, SlotStore};

/// Default interval between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Lifecycle configuration.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Interval between ticks.
    pub tick_interval: Duration,

    /// Fixed seed for the allocation shuffle. `None` draws from OS entropy.
    pub allocation_seed: Option<u64>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            allocation_seed: None,
        }
    }
}

/// The step a slot is due for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Generate,
    Activate,
    Complete,
}

impl Step {
    fn target(self) -> SlotStatus {
        match self {
            Self::Generate => SlotStatus::Generated,
            Self::Activate => SlotStatus::Active,
            Self::Complete => SlotStatus::Completed,
        }
    }
}

/// Decides the next step for `slot` at `now`, if any.
///
/// Overdue slots are still walked forward one step at a time. The one cutoff
/// is a slot that already failed on capacity: once its window closes it is
/// not retried.
pub fn next_step(slot: &ExamSlot, now: DateTime<Utc>) -> Option<Step> {
    match slot.status {
        SlotStatus::Pending if slot.failed_generations > 0 && now >= slot.end_time => None,
        SlotStatus::Pending if now >= slot.generation_time() => Some(Step::Generate),
        SlotStatus::Generated if now >= slot.start_time => Some(Step::Activate),
        SlotStatus::Active if now >= slot.end_time => Some(Step::Complete),
        _ => None,
    }
}

/// A status change applied during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub slot_id: SlotId,
    pub from: SlotStatus,
    pub to: SlotStatus,
}

/// A generation attempt that did not fit; the slot stays pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub slot_id: SlotId,
    pub slot_name: String,
    pub error: AllocationError,
}

/// What a tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub slots_evaluated: usize,
    pub transitions: Vec<Transition>,
    pub failures: Vec<GenerationFailure>,
}

impl TickReport {
    /// True if nothing changed and nothing failed.
    pub fn is_quiet(&self) -> bool {
        self.transitions.is_empty() && self.failures.is_empty()
    }
}

#[derive(Debug)]
enum Outcome {
    Unchanged,
    Advanced(Transition),
    Failed(GenerationFailure),
}

/// Drives slots through their lifecycle.
pub struct SlotLifecycle {
    store: Arc<SlotStore>,
    roster: Arc<dyn Roster>,
    allocation_seed: Option<u64>,
}

impl SlotLifecycle {
    pub fn new(store: Arc<SlotStore>, roster: Arc<dyn Roster>, config: &LifecycleConfig) -> Self {
        Self {
            store,
            roster,
            allocation_seed: config.allocation_seed,
        }
    }

    /// Evaluates every slot once at `now`.
    #[instrument(skip(self), fields(now = %now))]
    pub async fn tick(&self, now: DateTime<Utc>) -> TickReport {
        let handles = self.store.handles().await;
        let mut report = TickReport {
            slots_evaluated: handles.len(),
            ..TickReport::default()
        };

        let mut tasks = JoinSet::new();
        for (slot_id, handle) in handles {
            let roster = Arc::clone(&self.roster);
            let rng = self.rng();
            tasks.spawn(evaluate(slot_id, handle, roster, rng, now));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Outcome::Unchanged) => {}
                Ok(Outcome::Advanced(transition)) => report.transitions.push(transition),
                Ok(Outcome::Failed(failure)) => report.failures.push(failure),
                Err(e) => error!(error = %e, "Slot evaluation task failed"),
            }
        }

        debug!(
            slots = report.slots_evaluated,
            transitions = report.transitions.len(),
            failures = report.failures.len(),
            "Lifecycle tick complete"
        );
        report
    }

    fn rng(&self) -> StdRng {
        match self.allocation_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

async fn evaluate(
    slot_id: SlotId,
    handle: SharedSlot,
    roster: Arc<dyn Roster>,
    rng: StdRng,
    now: DateTime<Utc>,
) -> Outcome {
    // Held across allocation: the decision and the write are one step.
    let mut slot = handle.lock().await;

    let Some(step) = next_step(&slot, now) else {
        return Outcome::Unchanged;
    };
    let from = slot.status;

    if step == Step::Generate {
        match generate(&slot, roster.as_ref(), rng).await {
            Ok(Some(plan)) => slot.seating_plan = plan,
            Ok(None) => return Outcome::Unchanged,
            Err(error) => {
                slot.failed_generations += 1;
                warn!(
                    slot_id = %slot_id,
                    name = %slot.name,
                    error = %error,
                    attempts = slot.failed_generations,
                    "Seating generation failed, slot stays pending"
                );
                return Outcome::Failed(GenerationFailure {
                    slot_id,
                    slot_name: slot.name.clone(),
                    error,
                });
            }
        }
    }

    slot.status = step.target();
    info!(
        slot_id = %slot_id,
        from = %from,
        to = %slot.status,
        seats = slot.seating_plan.len(),
        "Slot advanced"
    );

    Outcome::Advanced(Transition {
        slot_id,
        from,
        to: slot.status,
    })
}

/// Runs the allocator for a pending slot.
///
/// `Ok(None)` means the allocation task itself died; the slot is retried on
/// the next tick.
async fn generate(
    slot: &ExamSlot,
    roster: &dyn Roster,
    mut rng: StdRng,
) -> Result<Option<Vec<Seating>>, AllocationError> {
    let students = roster.students_in(&slot.class_group_ids).await;
    let mut halls = roster.halls_in(&slot.hall_ids).await;
    sort_fill_order(&mut halls);

    let allocation =
        tokio::task::spawn_blocking(move || allocate(&students, &halls, &mut rng)).await;

    match allocation {
        Ok(result) => result.map(|allocation| {
            debug!(slot_id = %slot.id, mode = ?allocation.mode, "Seating plan generated");
            Some(allocation.seats)
        }),
        Err(e) => {
            error!(slot_id = %slot.id, error = %e, "Allocation task panicked");
            Ok(None)
        }
    }
}
