//! Balancer configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::balancing::BalancingStrategy;

/// Upper bound on the per-consultant capacity ceiling.
const MAX_SESSIONS_LIMIT: u32 = 10_000;

/// Balancer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BalancerSettings {
    /// Capacity ceiling applied to every consultant
    #[serde(default = "default_max_sessions")]
    pub max_sessions_per_consultant: u32,

    /// Idle time in seconds before a session is reclaimed
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// Time in seconds between reclaim sweeps
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Initial assignment strategy
    #[serde(default)]
    pub strategy: BalancingStrategy,
}

impl BalancerSettings {
    /// Get session timeout as Duration
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Get cleanup interval as Duration
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Validate balancer configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_sessions_per_consultant == 0
            || self.max_sessions_per_consultant > MAX_SESSIONS_LIMIT
        {
            return Err(ValidationError::InvalidMaxSessions);
        }
        if self.session_timeout_secs == 0 {
            return Err(ValidationError::InvalidSessionTimeout);
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ValidationError::InvalidCleanupInterval);
        }
        Ok(())
    }
}

impl Default for BalancerSettings {
    fn default() -> Self {
        Self {
            max_sessions_per_consultant: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
            strategy: BalancingStrategy::default(),
        }
    }
}

fn default_max_sessions() -> u32 {
    5
}

fn default_session_timeout() -> u64 {
    30 * 60
}

fn default_cleanup_interval() -> u64 {
    5 * 60
}
