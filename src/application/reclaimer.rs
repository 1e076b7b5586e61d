//! SessionReclaimer - background eviction of idle sessions.
//!
//! Wakes on a fixed interval and asks the sweeper to time out every
//! session idle past the balancer's session timeout.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 5min | Time between sweeps |
//!
//! ## Shutdown
//!
//! The shutdown signal is only checked between sweeps. A sweep that has
//! started always runs to completion, and no further sweep starts once
//! the signal is set.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::ports::IdleSessionSweeper;

/// Configuration for the SessionReclaimer service.
#[derive(Debug, Clone)]
pub struct ReclaimerConfig {
    /// Time between sweeps.
    pub interval: Duration,
}

impl Default for ReclaimerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
        }
    }
}

impl ReclaimerConfig {
    /// Create config with custom sweep interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Background service that reclaims idle sessions.
pub struct SessionReclaimer {
    sweeper: Arc<dyn IdleSessionSweeper>,
    config: ReclaimerConfig,
}

impl SessionReclaimer {
    /// Create a new SessionReclaimer with default configuration.
    pub fn new(sweeper: Arc<dyn IdleSessionSweeper>) -> Self {
        Self::with_config(sweeper, ReclaimerConfig::default())
    }

    /// Create a new SessionReclaimer with custom configuration.
    pub fn with_config(sweeper: Arc<dyn IdleSessionSweeper>, config: ReclaimerConfig) -> Self {
        Self { sweeper, config }
    }

    /// Run sweeps until the shutdown signal is set or its sender is dropped.
    ///
    /// The first sweep happens one full interval after start.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        // A zero period would make tokio's interval panic.
        let period = self.config.interval.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = period.as_secs_f64(), "Session reclaimer started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }

                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
            }
        }

        info!("Session reclaimer stopped");
    }

    /// Run exactly one sweep. Returns the number of sessions reclaimed.
    pub async fn sweep_once(&self) -> usize {
        let reclaimed = self.sweeper.sweep_idle_sessions().await;
        debug!(reclaimed, "Reclaim sweep finished");
        reclaimed
    }
}
