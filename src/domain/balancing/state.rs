//! Synchronous balancer state.
//!
//! Everything the balancer guards with its lock: registry, counters,
//! active strategy and capacity ceiling. Each method is one atomic step
//! when called under an exclusive borrow, which is how
//! [`ConsultantBalancer`](crate::application::ConsultantBalancer) calls it.

use std::time::Duration;

use super::{
    AssignRequest, AssignmentOutcome, BalancerError, BalancerMetrics, BalancingStrategy, Registry,
    SessionCounters,
};
use crate::domain::consultant::{
    Consultant, ConsultantProfile, ConsultantSnapshot, ConsultantStatus,
};
use crate::domain::foundation::{ConsultantId, SessionId, Timestamp};
use crate::domain::session::Session;

#[derive(Debug, Clone)]
pub struct BalancerState {
    registry: Registry,
    counters: SessionCounters,
    strategy: BalancingStrategy,
    capacity_ceiling: u32,
}

impl BalancerState {
    /// Builds the state from a static roster.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a zero ceiling, zero roster capacity or
    /// duplicate consultant identifiers.
    pub fn new(
        roster: impl IntoIterator<Item = ConsultantProfile>,
        capacity_ceiling: u32,
        strategy: BalancingStrategy,
        now: Timestamp,
    ) -> Result<Self, BalancerError> {
        Consultant::validate_ceiling(capacity_ceiling)?;
        Ok(Self {
            registry: Registry::from_roster(roster, capacity_ceiling, now)?,
            counters: SessionCounters::default(),
            strategy,
            capacity_ceiling,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn strategy(&self) -> BalancingStrategy {
        self.strategy
    }

    pub fn capacity_ceiling(&self) -> u32 {
        self.capacity_ceiling
    }

    /// Places a session, or refreshes it if already tracked.
    pub fn assign(&mut self, request: &AssignRequest, now: Timestamp) -> AssignmentOutcome {
        if let Some(session) = self.registry.session_mut(&request.session_id) {
            session.touch(now);
            return AssignmentOutcome::Assigned {
                consultant_id: session.consultant_id().clone(),
                reused: true,
            };
        }

        let Some(consultant_id) = self.pick(request) else {
            self.counters.record_rejection();
            return AssignmentOutcome::Rejected;
        };

        let session = Session::open(
            request.session_id.clone(),
            consultant_id.clone(),
            request.priority,
            request.metadata.clone(),
            now,
        );
        if self.registry.insert_session(session, now).is_err() {
            // The candidate came from the registry itself, so this is unreachable.
            self.counters.record_rejection();
            return AssignmentOutcome::Rejected;
        }
        self.counters.record_placement();

        AssignmentOutcome::Assigned {
            consultant_id,
            reused: false,
        }
    }

    /// Preferred consultant first, then the configured strategy.
    fn pick(&self, request: &AssignRequest) -> Option<ConsultantId> {
        let preferred = request
            .preferred_consultant
            .as_ref()
            .and_then(|id| self.registry.consultant(id))
            .filter(|c| c.is_assignable());
        if let Some(consultant) = preferred {
            return Some(consultant.id().clone());
        }

        self.strategy
            .select(
                self.registry.consultants(),
                request,
                self.counters.total_sessions,
            )
            .cloned()
    }

    /// Closes a session on behalf of its caller.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if the session is not tracked (never seen, already
    /// released, or already reclaimed).
    pub fn release(&mut self, id: &SessionId, now: Timestamp) -> Result<Session, BalancerError> {
        let session = self
            .registry
            .session_mut(id)
            .ok_or_else(|| BalancerError::SessionNotFound(id.clone()))?;
        session.complete().map_err(BalancerError::InvalidTransition)?;

        let session = self
            .registry
            .remove_session(id, now)
            .ok_or_else(|| BalancerError::SessionNotFound(id.clone()))?;
        self.counters.record_close();
        Ok(session)
    }

    /// Times out every session idle for longer than `timeout`.
    ///
    /// Returns the reclaimed sessions in identifier order.
    pub fn reclaim_idle(&mut self, timeout: Duration, now: Timestamp) -> Vec<Session> {
        let mut reclaimed = Vec::new();
        for id in self.registry.idle_sessions(timeout, &now) {
            let Some(session) = self.registry.session_mut(&id) else {
                continue;
            };
            if session.time_out().is_err() {
                continue;
            }
            if let Some(session) = self.registry.remove_session(&id, now) {
                self.counters.record_close();
                reclaimed.push(session);
            }
        }
        reclaimed
    }

    pub fn set_strategy(&mut self, strategy: BalancingStrategy) {
        self.strategy = strategy;
    }

    /// Operator override: caps every consultant at `ceiling` and forces
    /// least-loaded balancing. Sessions already placed are never evicted.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `ceiling` is zero.
    pub fn tune_capacity(&mut self, ceiling: u32) -> Result<(), BalancerError> {
        Consultant::validate_ceiling(ceiling)?;
        self.capacity_ceiling = ceiling;
        self.strategy = BalancingStrategy::LeastLoaded;
        for consultant in self.registry.consultants_mut() {
            consultant.apply_ceiling(ceiling);
        }
        Ok(())
    }

    /// Sets or clears the administrative offline signal on one consultant.
    ///
    /// # Errors
    ///
    /// `ConsultantNotFound` for an identifier not on the roster.
    pub fn set_consultant_offline(
        &mut self,
        id: &ConsultantId,
        offline: bool,
    ) -> Result<ConsultantStatus, BalancerError> {
        let consultant = self
            .registry
            .consultant_mut(id)
            .ok_or_else(|| BalancerError::ConsultantNotFound(id.clone()))?;
        consultant.set_offline(offline);
        Ok(consultant.status())
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.registry.session(id)
    }

    pub fn consultant(&self, id: &ConsultantId) -> Option<ConsultantSnapshot> {
        self.registry.consultant(id).map(|c| c.snapshot())
    }

    pub fn consultants(&self) -> Vec<ConsultantSnapshot> {
        self.registry
            .consultants()
            .values()
            .map(|c| c.snapshot())
            .collect()
    }

    pub fn metrics(&self, now: Timestamp) -> BalancerMetrics {
        BalancerMetrics::collect(&self.registry, &self.counters, self.strategy, now)
    }
}
