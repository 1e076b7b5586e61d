//! Point-in-time utilization snapshot.

use serde::{Deserialize, Serialize};

use super::{BalancingStrategy, Registry};
use crate::domain::consultant::ConsultantStatus;
use crate::domain::foundation::Timestamp;

/// Running session counters maintained by the balancer.
///
/// `total_sessions` and `balanced_sessions` count successful placements of
/// new sessions. Repeat requests for a tracked session count toward neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub balanced_sessions: u64,
    pub rejected_sessions: u64,
}

impl SessionCounters {
    pub(crate) fn record_placement(&mut self) {
        self.total_sessions += 1;
        self.active_sessions += 1;
        self.balanced_sessions += 1;
    }

    pub(crate) fn record_rejection(&mut self) {
        self.rejected_sessions += 1;
    }

    pub(crate) fn record_close(&mut self) {
        self.active_sessions = self.active_sessions.saturating_sub(1);
    }
}

/// Utilization snapshot handed to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancerMetrics {
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub balanced_sessions: u64,
    pub rejected_sessions: u64,
    pub total_consultants: usize,
    pub available_consultants: usize,
    pub busy_consultants: usize,
    /// Mean of `current_load` over every consultant, offline ones included.
    pub average_load: f64,
    pub strategy: BalancingStrategy,
    pub timestamp: Timestamp,
}

impl BalancerMetrics {
    /// Aggregates counters and a single pass over the consultants.
    pub fn collect(
        registry: &Registry,
        counters: &SessionCounters,
        strategy: BalancingStrategy,
        now: Timestamp,
    ) -> Self {
        let mut available = 0;
        let mut busy = 0;
        let mut load_sum = 0.0;
        let consultants = registry.consultants();

        for consultant in consultants.values() {
            match consultant.status() {
                ConsultantStatus::Available => available += 1,
                ConsultantStatus::Busy => busy += 1,
                ConsultantStatus::Offline => {}
            }
            load_sum += consultant.current_load();
        }

        let average_load = if consultants.is_empty() {
            0.0
        } else {
            load_sum / consultants.len() as f64
        };

        Self {
            total_sessions: counters.total_sessions,
            active_sessions: counters.active_sessions,
            balanced_sessions: counters.balanced_sessions,
            rejected_sessions: counters.rejected_sessions,
            total_consultants: consultants.len(),
            available_consultants: available,
            busy_consultants: busy,
            average_load,
            strategy,
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consultant::ConsultantProfile;
    use crate::domain::foundation::{ConsultantId, SessionId, SessionPriority};
    use crate::domain::session::Session;

    #[test]
    fn counters_never_go_negative() {
        let mut counters = SessionCounters::default();
        counters.record_close();
        assert_eq!(counters.active_sessions, 0);
    }

    #[test]
    fn empty_roster_has_zero_average_load() {
        let registry = Registry::default();
        let metrics = BalancerMetrics::collect(
            &registry,
            &SessionCounters::default(),
            BalancingStrategy::LeastLoaded,
            Timestamp::now(),
        );
        assert_eq!(metrics.total_consultants, 0);
        assert_eq!(metrics.average_load, 0.0);
    }

    #[test]
    fn collect_counts_statuses_and_averages_load() {
        let now = Timestamp::now();
        let cid = |id: &str| ConsultantId::new(id).unwrap();
        let mut registry = Registry::from_roster(
            [
                ConsultantProfile::new(cid("c1"), "Ada").with_capacity(1),
                ConsultantProfile::new(cid("c2"), "Grace").with_capacity(2),
                ConsultantProfile::new(cid("c3"), "Linus").offline(),
            ],
            4,
            now,
        )
        .unwrap();
        registry
            .insert_session(
                Session::open(
                    SessionId::new("s1").unwrap(),
                    cid("c1"),
                    SessionPriority::Normal,
                    Default::default(),
                    now,
                ),
                now,
            )
            .unwrap();

        let metrics = BalancerMetrics::collect(
            &registry,
            &SessionCounters::default(),
            BalancingStrategy::RoundRobin,
            now,
        );

        assert_eq!(metrics.total_consultants, 3);
        assert_eq!(metrics.busy_consultants, 1);
        assert_eq!(metrics.available_consultants, 1);
        assert!((metrics.average_load - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.strategy, BalancingStrategy::RoundRobin);
    }
}
