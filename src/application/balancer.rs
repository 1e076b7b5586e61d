//! ConsultantBalancer - the session assignment engine.
//!
//! Owns one reader/writer lock over [`BalancerState`]. Assign, release,
//! reclamation, strategy switches, capacity tuning and offline toggles take
//! the write lock; metrics and lookups take the read lock. The lock is
//! never held across an await point, so every hold is bounded CPU work.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `max_sessions_per_consultant` | 5 | Capacity ceiling per consultant |
//! | `session_timeout` | 30min | Idle time before a session is reclaimed |
//! | `strategy` | least-loaded | Selection policy for new sessions |

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::balancing::{
    AssignRequest, AssignmentOutcome, BalancerError, BalancerMetrics, BalancerState,
    BalancingStrategy,
};
use crate::domain::consultant::{ConsultantProfile, ConsultantSnapshot, ConsultantStatus};
use crate::domain::foundation::{ConsultantId, SessionId, Timestamp, ValidationError};
use crate::domain::session::Session;
use crate::ports::{IdleSessionSweeper, SessionAssigner};

/// Construction-time configuration for [`ConsultantBalancer`].
#[derive(Debug, Clone)]
pub struct BalancerConfig {
    /// Capacity ceiling applied to every consultant.
    pub max_sessions_per_consultant: u32,

    /// Idle time after which the reclaimer times a session out.
    pub session_timeout: Duration,

    /// Initial selection policy.
    pub strategy: BalancingStrategy,

    /// Static roster provisioned at startup.
    pub roster: Vec<ConsultantProfile>,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            max_sessions_per_consultant: 5,
            session_timeout: Duration::from_secs(30 * 60),
            strategy: BalancingStrategy::LeastLoaded,
            roster: Vec::new(),
        }
    }
}

impl BalancerConfig {
    pub fn with_max_sessions_per_consultant(mut self, max: u32) -> Self {
        self.max_sessions_per_consultant = max;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_strategy(mut self, strategy: BalancingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_consultant(mut self, profile: ConsultantProfile) -> Self {
        self.roster.push(profile);
        self
    }
}

/// In-process session assignment engine.
///
/// Construct one per process and share it behind an `Arc`.
#[derive(Debug)]
pub struct ConsultantBalancer {
    state: RwLock<BalancerState>,
    session_timeout: Duration,
}

impl ConsultantBalancer {
    /// Builds the engine and provisions the roster.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a zero capacity ceiling, zero session
    /// timeout, zero roster capacity or duplicate consultant identifiers.
    pub fn new(config: BalancerConfig) -> Result<Self, BalancerError> {
        if config.session_timeout.is_zero() {
            return Err(ValidationError::invalid_format(
                "session_timeout",
                "must be greater than zero",
            )
            .into());
        }

        let consultant_count = config.roster.len();
        let state = BalancerState::new(
            config.roster,
            config.max_sessions_per_consultant,
            config.strategy,
            Timestamp::now(),
        )?;

        info!(
            consultants = consultant_count,
            max_sessions_per_consultant = config.max_sessions_per_consultant,
            session_timeout_secs = config.session_timeout.as_secs_f64(),
            strategy = %config.strategy,
            "Consultant balancer initialised"
        );

        Ok(Self {
            state: RwLock::new(state),
            session_timeout: config.session_timeout,
        })
    }

    pub fn session_timeout(&self) -> Duration {
        self.session_timeout
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns a copy of a tracked session.
    pub async fn session(&self, id: &SessionId) -> Option<Session> {
        self.state.read().await.session(id).cloned()
    }

    pub async fn consultant(&self, id: &ConsultantId) -> Option<ConsultantSnapshot> {
        self.state.read().await.consultant(id)
    }

    /// All consultants, ordered by identifier.
    pub async fn consultants(&self) -> Vec<ConsultantSnapshot> {
        self.state.read().await.consultants()
    }

    pub async fn strategy(&self) -> BalancingStrategy {
        self.state.read().await.strategy()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operator actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Switches the selection policy for subsequent new sessions.
    pub async fn set_strategy(&self, strategy: BalancingStrategy) {
        let mut state = self.state.write().await;
        let previous = state.strategy();
        state.set_strategy(strategy);
        info!(from = %previous, to = %strategy, "Balancing strategy switched");
    }

    /// Lowers the per-consultant ceiling and forces least-loaded balancing.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `ceiling` is zero.
    pub async fn tune_capacity(&self, ceiling: u32) -> Result<(), BalancerError> {
        let mut state = self.state.write().await;
        let previous = state.capacity_ceiling();
        state.tune_capacity(ceiling)?;
        info!(
            from = previous,
            to = ceiling,
            strategy = %state.strategy(),
            "Consultant capacity tuned"
        );
        Ok(())
    }

    /// Applies or clears the administrative offline signal.
    ///
    /// # Errors
    ///
    /// `ConsultantNotFound` for an identifier not on the roster.
    pub async fn set_consultant_offline(
        &self,
        id: &ConsultantId,
        offline: bool,
    ) -> Result<ConsultantStatus, BalancerError> {
        let status = self.state.write().await.set_consultant_offline(id, offline)?;
        info!(consultant_id = %id, status = %status, "Consultant availability changed");
        Ok(status)
    }

    /// Reclaims sessions idle past the timeout as of `now`.
    ///
    /// The whole pass runs under one write-lock acquisition.
    pub async fn reclaim_idle_at(&self, now: Timestamp) -> Vec<Session> {
        let reclaimed = self
            .state
            .write()
            .await
            .reclaim_idle(self.session_timeout, now);

        for session in &reclaimed {
            debug!(
                session_id = %session.id(),
                consultant_id = %session.consultant_id(),
                requests = session.request_count(),
                "Session timed out"
            );
        }
        if !reclaimed.is_empty() {
            info!(count = reclaimed.len(), "Reclaimed idle sessions");
        }
        reclaimed
    }
}

#[async_trait]
impl SessionAssigner for ConsultantBalancer {
    async fn assign_request(&self, request: AssignRequest) -> AssignmentOutcome {
        let outcome = self.state.write().await.assign(&request, Timestamp::now());

        match &outcome {
            AssignmentOutcome::Assigned {
                consultant_id,
                reused: true,
            } => debug!(
                session_id = %request.session_id,
                consultant_id = %consultant_id,
                "Session reused"
            ),
            AssignmentOutcome::Assigned {
                consultant_id,
                reused: false,
            } => debug!(
                session_id = %request.session_id,
                consultant_id = %consultant_id,
                priority = %request.priority,
                "Session assigned"
            ),
            AssignmentOutcome::Rejected => warn!(
                session_id = %request.session_id,
                priority = %request.priority,
                "No consultant capacity, session rejected"
            ),
        }
        outcome
    }

    async fn release(&self, session_id: &SessionId) -> Result<(), BalancerError> {
        let session = self
            .state
            .write()
            .await
            .release(session_id, Timestamp::now())?;
        debug!(
            session_id = %session_id,
            consultant_id = %session.consultant_id(),
            requests = session.request_count(),
            "Session released"
        );
        Ok(())
    }

    async fn metrics(&self) -> BalancerMetrics {
        self.state.read().await.metrics(Timestamp::now())
    }
}

#[async_trait]
impl IdleSessionSweeper for ConsultantBalancer {
    async fn sweep_idle_sessions(&self) -> usize {
        self.reclaim_idle_at(Timestamp::now()).await.len()
    }
}
