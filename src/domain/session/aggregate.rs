//! Session entity.
//!
//! A session is sticky to the consultant it was first assigned to. The
//! balancer creates it on the first request for an unseen identifier,
//! refreshes it on every repeat request, and closes it exactly once,
//! either by an explicit release or by idle reclamation.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ConsultantId, SessionId, SessionPriority, SessionStatus, StateMachine, Timestamp,
    ValidationError,
};

/// A client session assigned to one consultant.
///
/// # Invariants
///
/// - `consultant_id` never changes after creation
/// - `request_count >= 1`
/// - `last_activity >= started_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    consultant_id: ConsultantId,
    started_at: Timestamp,
    last_activity: Timestamp,
    request_count: u64,
    priority: SessionPriority,
    status: SessionStatus,
    metadata: BTreeMap<String, String>,
}

impl Session {
    /// Opens a new active session on `consultant_id`.
    pub fn open(
        id: SessionId,
        consultant_id: ConsultantId,
        priority: SessionPriority,
        metadata: BTreeMap<String, String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            consultant_id,
            started_at: now,
            last_activity: now,
            request_count: 1,
            priority,
            status: SessionStatus::Active,
            metadata,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn consultant_id(&self) -> &ConsultantId {
        &self.consultant_id
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn last_activity(&self) -> &Timestamp {
        &self.last_activity
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn priority(&self) -> SessionPriority {
        self.priority
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Records a repeat request: refreshes activity and bumps the counter.
    pub fn touch(&mut self, now: Timestamp) {
        if self.last_activity.is_before(&now) {
            self.last_activity = now;
        }
        self.request_count = self.request_count.saturating_add(1);
    }

    /// Closes the session on behalf of the caller.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the session is already closed.
    pub fn complete(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SessionStatus::Completed)?;
        Ok(())
    }

    /// Closes the session because it sat idle past the timeout.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the session is already closed.
    pub fn time_out(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SessionStatus::TimedOut)?;
        Ok(())
    }

    /// Returns true if the session is still open and has been idle for
    /// longer than `timeout`. Closed sessions are never idle.
    pub fn is_idle_past(&self, timeout: Duration, now: &Timestamp) -> bool {
        self.status.is_open() && self.last_activity.has_elapsed(timeout, now)
    }
}
