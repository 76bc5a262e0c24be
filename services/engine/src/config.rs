//! Configuration for the engine service.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::lifecycle::{LifecycleConfig, DEFAULT_TICK_INTERVAL};

/// Engine service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval between lifecycle ticks.
    pub tick_interval: Duration,

    /// Fixed allocation seed, for reproducible plans.
    pub allocation_seed: Option<u64>,

    /// JSON roster snapshot loaded at start-up.
    pub roster_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tick_interval = match lookup("SEATWISE_TICK_INTERVAL_SECS") {
            Some(v) => {
                let secs: u64 = v
                    .parse()
                    .with_context(|| format!("SEATWISE_TICK_INTERVAL_SECS is not a number: {v}"))?;
                anyhow::ensure!(secs > 0, "SEATWISE_TICK_INTERVAL_SECS must be positive");
                Duration::from_secs(secs)
            }
            None => DEFAULT_TICK_INTERVAL,
        };

        let allocation_seed = lookup("SEATWISE_ALLOCATION_SEED")
            .map(|v| {
                v.parse::<u64>()
                    .with_context(|| format!("SEATWISE_ALLOCATION_SEED is not a u64: {v}"))
            })
            .transpose()?;

        let roster_path = lookup("SEATWISE_ROSTER_PATH").map(PathBuf::from);

        let log_level = lookup("SEATWISE_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            tick_interval,
            allocation_seed,
            roster_path,
            log_level,
        })
    }

    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            tick_interval: self.tick_interval,
            allocation_seed: self.allocation_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert!(config.allocation_seed.is_none());
        assert!(config.roster_path.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SEATWISE_TICK_INTERVAL_SECS", "30"),
            ("SEATWISE_ALLOCATION_SEED", "42"),
            ("SEATWISE_ROSTER_PATH", "/etc/seatwise/roster.json"),
        ])
        .unwrap();
        assert_eq!(config.lifecycle().tick_interval, Duration::from_secs(30));
        assert_eq!(config.lifecycle().allocation_seed, Some(42));
        assert_eq!(
            config.roster_path,
            Some(PathBuf::from("/etc/seatwise/roster.json"))
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(load(&[("SEATWISE_TICK_INTERVAL_SECS", "0")]).is_err());
        assert!(load(&[("SEATWISE_TICK_INTERVAL_SECS", "soon")]).is_err());
        assert!(load(&[("SEATWISE_ALLOCATION_SEED", "-1")]).is_err());
    }
}
