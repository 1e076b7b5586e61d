//! Session and consultant registry.
//!
//! Pure bookkeeping: who is tracked and which consultant owns which
//! session. Policy (which consultant to pick, counters, strategy) lives in
//! [`BalancerState`](super::BalancerState).
//!
//! Every mutation that touches a session also touches its consultant, so
//! an open session is always in exactly one consultant's active set.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use super::BalancerError;
use crate::domain::consultant::{Consultant, ConsultantProfile};
use crate::domain::foundation::{ConsultantId, SessionId, Timestamp, ValidationError};
use crate::domain::session::Session;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    sessions: HashMap<SessionId, Session>,
    consultants: BTreeMap<ConsultantId, Consultant>,
}

impl Registry {
    /// Provisions every roster entry against the capacity ceiling.
    ///
    /// # Errors
    ///
    /// Returns a validation error for duplicate identifiers or zero capacity.
    pub fn from_roster(
        roster: impl IntoIterator<Item = ConsultantProfile>,
        ceiling: u32,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        let mut consultants = BTreeMap::new();
        for profile in roster {
            if !seen.insert(profile.id.clone()) {
                return Err(ValidationError::duplicate("consultant_id", profile.id.as_str()));
            }
            let consultant = Consultant::provision(profile, ceiling, now)?;
            consultants.insert(consultant.id().clone(), consultant);
        }
        Ok(Self {
            sessions: HashMap::new(),
            consultants,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn session_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Tracks a new session and adds it to its consultant's active set.
    ///
    /// # Errors
    ///
    /// `ConsultantNotFound` if the session names an unknown consultant.
    /// The registry is left untouched in that case.
    pub fn insert_session(&mut self, session: Session, now: Timestamp) -> Result<(), BalancerError> {
        let consultant = self
            .consultants
            .get_mut(session.consultant_id())
            .ok_or_else(|| BalancerError::ConsultantNotFound(session.consultant_id().clone()))?;
        consultant.attach(session.id().clone(), now);
        self.sessions.insert(session.id().clone(), session);
        Ok(())
    }

    /// Stops tracking a session and frees its consultant slot.
    pub fn remove_session(&mut self, id: &SessionId, now: Timestamp) -> Option<Session> {
        let session = self.sessions.remove(id)?;
        if let Some(consultant) = self.consultants.get_mut(session.consultant_id()) {
            consultant.detach(id, now);
        }
        Some(session)
    }

    /// Identifiers of sessions idle for longer than `timeout`, in id order.
    pub fn idle_sessions(&self, timeout: Duration, now: &Timestamp) -> Vec<SessionId> {
        let mut idle: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|s| s.is_idle_past(timeout, now))
            .map(|s| s.id().clone())
            .collect();
        idle.sort();
        idle
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consultants
    // ─────────────────────────────────────────────────────────────────────────

    /// All consultants, ordered by identifier.
    pub fn consultants(&self) -> &BTreeMap<ConsultantId, Consultant> {
        &self.consultants
    }

    pub fn consultant(&self, id: &ConsultantId) -> Option<&Consultant> {
        self.consultants.get(id)
    }

    pub fn consultant_mut(&mut self, id: &ConsultantId) -> Option<&mut Consultant> {
        self.consultants.get_mut(id)
    }

    pub fn consultants_mut(&mut self) -> impl Iterator<Item = &mut Consultant> {
        self.consultants.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionPriority;

    fn cid(id: &str) -> ConsultantId {
        ConsultantId::new(id).unwrap()
    }

    fn sid(id: &str) -> SessionId {
        SessionId::new(id).unwrap()
    }

    fn registry() -> Registry {
        Registry::from_roster(
            [
                ConsultantProfile::new(cid("c2"), "Grace"),
                ConsultantProfile::new(cid("c1"), "Ada"),
            ],
            2,
            Timestamp::now(),
        )
        .unwrap()
    }

    fn session(id: &str, consultant: &str, now: Timestamp) -> Session {
        Session::open(
            sid(id),
            cid(consultant),
            SessionPriority::Normal,
            Default::default(),
            now,
        )
    }

    #[test]
    fn consultants_are_ordered_by_id() {
        let reg = registry();
        let ids: Vec<_> = reg.consultants().keys().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2"]);
    }

    #[test]
    fn duplicate_roster_ids_are_rejected() {
        let result = Registry::from_roster(
            [
                ConsultantProfile::new(cid("c1"), "Ada"),
                ConsultantProfile::new(cid("c1"), "Ada again"),
            ],
            2,
            Timestamp::now(),
        );
        assert!(matches!(result, Err(ValidationError::Duplicate { .. })));
    }

    #[test]
    fn insert_and_remove_keep_both_sides_in_sync() {
        let mut reg = registry();
        let now = Timestamp::now();

        reg.insert_session(session("s1", "c1", now), now).unwrap();
        assert_eq!(reg.session_count(), 1);
        assert!(reg.consultant(&cid("c1")).unwrap().active_sessions().contains(&sid("s1")));
        assert_eq!(reg.consultant(&cid("c1")).unwrap().current_load(), 0.5);

        let removed = reg.remove_session(&sid("s1"), now).unwrap();
        assert_eq!(removed.id(), &sid("s1"));
        assert_eq!(reg.session_count(), 0);
        assert_eq!(reg.consultant(&cid("c1")).unwrap().current_load(), 0.0);
    }

    #[test]
    fn insert_for_unknown_consultant_leaves_registry_untouched() {
        let mut reg = registry();
        let now = Timestamp::now();
        let err = reg.insert_session(session("s1", "ghost", now), now).unwrap_err();
        assert_eq!(err, BalancerError::ConsultantNotFound(cid("ghost")));
        assert_eq!(reg.session_count(), 0);
    }

    #[test]
    fn remove_unknown_session_is_none() {
        let mut reg = registry();
        assert!(reg.remove_session(&sid("nope"), Timestamp::now()).is_none());
    }

    #[test]
    fn idle_sessions_are_sorted_and_filtered() {
        let mut reg = registry();
        let start = Timestamp::now();
        reg.insert_session(session("s2", "c1", start), start).unwrap();
        reg.insert_session(session("s1", "c2", start), start).unwrap();
        let fresh = start.plus(Duration::from_secs(50));
        reg.insert_session(session("s3", "c2", fresh), fresh).unwrap();

        let now = start.plus(Duration::from_secs(61));
        let idle = reg.idle_sessions(Duration::from_secs(60), &now);
        assert_eq!(idle, [sid("s1"), sid("s2")]);
    }
}
