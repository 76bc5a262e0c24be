//! Lifecycle background worker.
//!
//! Runs [`SlotLifecycle::tick`] on a fixed interval until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, instrument, warn};

use crate::clock::Clock;
use crate::lifecycle::SlotLifecycle;

/// Worker that ticks the slot lifecycle.
pub struct LifecycleWorker {
    lifecycle: Arc<SlotLifecycle>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl LifecycleWorker {
    pub fn new(lifecycle: Arc<SlotLifecycle>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            lifecycle,
            clock,
            interval,
        }
    }

    /// Run the worker until shutdown is signaled.
    ///
    /// The first tick fires immediately so transitions that fell due while
    /// the process was down are applied on start-up.
    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Starting lifecycle worker"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Lifecycle worker shutting down");
                        break;
                    }
                }
            }
        }
    }

    async fn run_tick(&self) {
        let report = self.lifecycle.tick(self.clock.now()).await;

        for failure in &report.failures {
            warn!(
                slot_id = %failure.slot_id,
                name = %failure.slot_name,
                error = %failure.error,
                "Slot cannot be seated; add halls or remove class groups before it starts"
            );
        }

        if !report.transitions.is_empty() {
            info!(
                slots = report.slots_evaluated,
                transitions = report.transitions.len(),
                "Lifecycle tick applied transitions"
            );
        }
    }
}
