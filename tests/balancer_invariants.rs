//! Property tests over the synchronous balancer state.

use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;

use consultant_balancer::domain::balancing::{
    AssignRequest, AssignmentOutcome, BalancerState, BalancingStrategy,
};
use consultant_balancer::domain::consultant::{ConsultantProfile, ConsultantStatus};
use consultant_balancer::domain::foundation::{ConsultantId, SessionId, SessionPriority, Timestamp};

#[derive(Debug, Clone)]
enum Op {
    Assign {
        session: u8,
        preferred: Option<u8>,
        priority: SessionPriority,
        specialization: bool,
    },
    Release(u8),
    Advance(u64),
    Reclaim,
    Strategy(BalancingStrategy),
    Tune(u32),
    Offline(u8, bool),
}

fn priority() -> impl Strategy<Value = SessionPriority> {
    prop_oneof![
        Just(SessionPriority::Low),
        Just(SessionPriority::Normal),
        Just(SessionPriority::High),
        Just(SessionPriority::Critical),
    ]
}

fn strategy() -> impl Strategy<Value = BalancingStrategy> {
    prop_oneof![
        Just(BalancingStrategy::LeastLoaded),
        Just(BalancingStrategy::RoundRobin),
        Just(BalancingStrategy::SpecializationAware),
        Just(BalancingStrategy::PriorityAware),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..24, proptest::option::of(0u8..5), priority(), any::<bool>()).prop_map(
            |(session, preferred, priority, specialization)| Op::Assign {
                session,
                preferred,
                priority,
                specialization,
            }
        ),
        3 => (0u8..24).prop_map(Op::Release),
        2 => (1u64..120).prop_map(Op::Advance),
        1 => Just(Op::Reclaim),
        1 => strategy().prop_map(Op::Strategy),
        1 => (1u32..6).prop_map(Op::Tune),
        1 => (0u8..4, any::<bool>()).prop_map(|(c, off)| Op::Offline(c, off)),
    ]
}

fn cid(n: u8) -> ConsultantId {
    ConsultantId::new(format!("c{n}")).unwrap()
}

fn sid(n: u8) -> SessionId {
    SessionId::new(format!("s{n}")).unwrap()
}

fn roster() -> Vec<ConsultantProfile> {
    vec![
        ConsultantProfile::new(cid(0), "Ada"),
        ConsultantProfile::new(cid(1), "Grace").with_capacity(2),
        ConsultantProfile::new(cid(2), "Edsger").with_specialization("tax"),
        ConsultantProfile::new(cid(3), "Barbara")
            .with_capacity(1)
            .with_specialization("tax"),
    ]
}

fn check_invariants(state: &BalancerState) -> Result<(), TestCaseError> {
    let mut attached = HashSet::new();
    let mut total_attached = 0usize;

    for consultant in state.consultants() {
        let count = consultant.active_sessions.len();
        prop_assert_eq!(
            consultant.current_load,
            count as f64 / consultant.max_sessions as f64
        );
        if consultant.status != ConsultantStatus::Offline {
            prop_assert_eq!(
                consultant.status == ConsultantStatus::Busy,
                consultant.current_load >= 1.0
            );
        }
        for session_id in &consultant.active_sessions {
            let session = state.session(session_id);
            prop_assert!(session.is_some());
            prop_assert_eq!(session.map(|s| s.consultant_id()), Some(&consultant.id));
            prop_assert!(attached.insert(session_id.clone()));
        }
        total_attached += count;
    }

    prop_assert_eq!(total_attached, state.registry().session_count());
    prop_assert_eq!(state.counters().active_sessions as usize, total_attached);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn state_stays_consistent(ops in proptest::collection::vec(op(), 1..80)) {
        let mut now = Timestamp::now();
        let timeout = Duration::from_secs(90);
        let mut state = BalancerState::new(roster(), 3, BalancingStrategy::LeastLoaded, now).unwrap();

        for op in ops {
            match op {
                Op::Assign { session, preferred, priority, specialization } => {
                    let id = sid(session);
                    let before = state.session(&id).map(|s| s.consultant_id().clone());
                    let mut request = AssignRequest::new(id.clone())
                        .with_preferred(preferred.map(cid))
                        .with_priority(priority);
                    if specialization {
                        request = request.with_specialization("tax");
                    }

                    let assigned_before = state.registry().session_count();
                    let rejected_before = state.counters().rejected_sessions;
                    let outcome = state.assign(&request, now);

                    match (&before, &outcome) {
                        (Some(existing), AssignmentOutcome::Assigned { consultant_id, reused }) => {
                            prop_assert!(*reused);
                            prop_assert_eq!(existing, consultant_id);
                            prop_assert_eq!(state.registry().session_count(), assigned_before);
                        }
                        (Some(_), AssignmentOutcome::Rejected) => {
                            prop_assert!(false, "tracked session must be reused");
                        }
                        (None, AssignmentOutcome::Assigned { consultant_id, reused }) => {
                            prop_assert!(!*reused);
                            let consultant = state.consultant(consultant_id).unwrap();
                            prop_assert!(consultant.active_sessions.len() <= consultant.max_sessions as usize);
                        }
                        (None, AssignmentOutcome::Rejected) => {
                            prop_assert_eq!(state.counters().rejected_sessions, rejected_before + 1);
                            prop_assert!(state.session(&id).is_none());
                        }
                    }
                }
                Op::Release(session) => {
                    let id = sid(session);
                    let tracked = state.session(&id).is_some();
                    prop_assert_eq!(state.release(&id, now).is_ok(), tracked);
                    prop_assert!(state.session(&id).is_none());
                }
                Op::Advance(secs) => now = now.plus(Duration::from_secs(secs)),
                Op::Reclaim => {
                    for session in state.reclaim_idle(timeout, now) {
                        prop_assert!(session.is_idle_past(timeout, &now));
                    }
                    let survivors: Vec<_> = state.registry().sessions().collect();
                    prop_assert!(survivors.iter().all(|s| !s.is_idle_past(timeout, &now)));
                }
                Op::Strategy(strategy) => state.set_strategy(strategy),
                Op::Tune(ceiling) => {
                    state.tune_capacity(ceiling).unwrap();
                    prop_assert_eq!(state.strategy(), BalancingStrategy::LeastLoaded);
                }
                Op::Offline(consultant, offline) => {
                    let status = state.set_consultant_offline(&cid(consultant), offline).unwrap();
                    prop_assert_eq!(status == ConsultantStatus::Offline, offline);
                }
            }
            check_invariants(&state)?;
        }
    }
}
