//! Consultant entity and its read model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{ConsultantProfile, ConsultantStatus};
use crate::domain::foundation::{ConsultantId, SessionId, Timestamp, ValidationError};

/// A capacity-bounded worker.
///
/// # Invariants
///
/// - `max_sessions > 0`
/// - `current_load == active_sessions.len() / max_sessions`
/// - unless `Offline`, status is `Busy` iff `current_load >= 1.0`
#[derive(Debug, Clone, PartialEq)]
pub struct Consultant {
    id: ConsultantId,
    name: String,
    active_sessions: BTreeSet<SessionId>,
    /// Capacity from the roster, before any operator ceiling is applied.
    roster_capacity: u32,
    max_sessions: u32,
    current_load: f64,
    specializations: BTreeSet<String>,
    status: ConsultantStatus,
    last_activity: Timestamp,
}

impl Consultant {
    /// Provisions a consultant from a roster entry.
    ///
    /// The effective capacity is the profile capacity capped by `ceiling`,
    /// or `ceiling` itself when the profile has none.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either capacity is zero.
    pub fn provision(
        profile: ConsultantProfile,
        ceiling: u32,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        profile.validate()?;
        Self::validate_ceiling(ceiling)?;

        let roster_capacity = profile.capacity.unwrap_or(ceiling);
        let initial_status = if profile.offline {
            ConsultantStatus::Offline
        } else {
            ConsultantStatus::Available
        };

        let mut consultant = Self {
            id: profile.id,
            name: profile.name,
            active_sessions: BTreeSet::new(),
            roster_capacity,
            max_sessions: roster_capacity.min(ceiling),
            current_load: 0.0,
            specializations: profile.specializations.into_iter().collect(),
            status: initial_status,
            last_activity: now,
        };
        consultant.recompute();
        Ok(consultant)
    }

    /// Rejects a zero capacity ceiling, which would make load undefined.
    pub fn validate_ceiling(ceiling: u32) -> Result<(), ValidationError> {
        if ceiling == 0 {
            return Err(ValidationError::out_of_range(
                "max_sessions_per_consultant",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ConsultantId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn active_sessions(&self) -> &BTreeSet<SessionId> {
        &self.active_sessions
    }

    pub fn active_count(&self) -> usize {
        self.active_sessions.len()
    }

    pub fn max_sessions(&self) -> u32 {
        self.max_sessions
    }

    pub fn current_load(&self) -> f64 {
        self.current_load
    }

    pub fn specializations(&self) -> &BTreeSet<String> {
        &self.specializations
    }

    pub fn status(&self) -> ConsultantStatus {
        self.status
    }

    pub fn last_activity(&self) -> &Timestamp {
        &self.last_activity
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Free slots left before reaching capacity.
    pub fn spare_slots(&self) -> usize {
        (self.max_sessions as usize).saturating_sub(self.active_sessions.len())
    }

    pub fn has_capacity(&self) -> bool {
        self.spare_slots() > 0
    }

    /// Available and under capacity: the only consultants a new session may land on.
    pub fn is_assignable(&self) -> bool {
        self.status == ConsultantStatus::Available && self.has_capacity()
    }

    pub fn has_specialization(&self, tag: &str) -> bool {
        self.specializations.contains(tag)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a session to the active set. Returns false if it was already there.
    pub fn attach(&mut self, session_id: SessionId, now: Timestamp) -> bool {
        let inserted = self.active_sessions.insert(session_id);
        self.last_activity = now;
        self.recompute();
        inserted
    }

    /// Removes a session from the active set. Returns false if it was absent.
    pub fn detach(&mut self, session_id: &SessionId, now: Timestamp) -> bool {
        let removed = self.active_sessions.remove(session_id);
        self.last_activity = now;
        self.recompute();
        removed
    }

    /// Caps the effective capacity at `ceiling` (never above the roster value).
    pub fn apply_ceiling(&mut self, ceiling: u32) {
        self.max_sessions = self.roster_capacity.min(ceiling).max(1);
        self.recompute();
    }

    /// Sets or clears the administrative offline signal.
    pub fn set_offline(&mut self, offline: bool) {
        self.status = if offline {
            ConsultantStatus::Offline
        } else {
            ConsultantStatus::from_load(self.current_load)
        };
        self.recompute();
    }

    fn recompute(&mut self) {
        self.current_load = self.active_sessions.len() as f64 / f64::from(self.max_sessions);
        if self.status != ConsultantStatus::Offline {
            self.status = ConsultantStatus::from_load(self.current_load);
        }
    }

    /// Read-only view for metrics and collaborators.
    pub fn snapshot(&self) -> ConsultantSnapshot {
        ConsultantSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            active_sessions: self.active_sessions.iter().cloned().collect(),
            max_sessions: self.max_sessions,
            current_load: self.current_load,
            specializations: self.specializations.iter().cloned().collect(),
            status: self.status,
            last_activity: self.last_activity,
        }
    }
}

/// Point-in-time copy of a consultant's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantSnapshot {
    pub id: ConsultantId,
    pub name: String,
    pub active_sessions: Vec<SessionId>,
    pub max_sessions: u32,
    pub current_load: f64,
    pub specializations: Vec<String>,
    pub status: ConsultantStatus,
    pub last_activity: Timestamp,
}
