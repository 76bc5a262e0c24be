//! seatwise engine service
//!
//! Loads the roster, then runs the slot lifecycle worker until Ctrl-C.
//! Slots are scheduled through [`ExamEngine`] by the surrounding shell.

use std::sync::Arc;

use anyhow::{Context, Result};
use seatwise_engine::config::Config;
use seatwise_engine::{ExamEngine, InMemoryRoster, RosterSnapshot, SystemClock};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        tick_interval_secs = config.tick_interval.as_secs(),
        seeded = config.allocation_seed.is_some(),
        "Starting seatwise engine"
    );

    let roster = match &config.roster_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading roster {}", path.display()))?;
            let snapshot: RosterSnapshot = serde_json::from_str(&raw)
                .with_context(|| format!("parsing roster {}", path.display()))?;
            InMemoryRoster::from_snapshot(snapshot).await?
        }
        None => InMemoryRoster::new(),
    };
    let snapshot = roster.snapshot().await;
    info!(
        class_groups = snapshot.class_groups.len(),
        students = snapshot.students.len(),
        halls = snapshot.halls.len(),
        "Roster loaded"
    );

    let engine = ExamEngine::new(Arc::new(roster), Arc::new(SystemClock), config.lifecycle());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = engine.worker();
    let worker_handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Received shutdown signal");

    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        error!(error = %e, "Lifecycle worker panicked");
    }

    info!("seatwise engine shutdown complete");
    Ok(())
}
