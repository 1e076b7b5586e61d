//! Assignment strategies.
//!
//! Strategies are stateless: they look at the consultant registry and the
//! request, and pick a consultant. Any state they depend on (such as the
//! round-robin position) lives in the balancer and is passed in.
//!
//! Consultants are iterated in identifier order, so every tie is broken
//! by the lowest identifier.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::AssignRequest;
use crate::domain::consultant::Consultant;
use crate::domain::foundation::ConsultantId;

/// The closed set of assignment policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BalancingStrategy {
    #[default]
    LeastLoaded,
    RoundRobin,
    SpecializationAware,
    PriorityAware,
}

impl BalancingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            BalancingStrategy::LeastLoaded => "least_loaded",
            BalancingStrategy::RoundRobin => "round_robin",
            BalancingStrategy::SpecializationAware => "specialization_aware",
            BalancingStrategy::PriorityAware => "priority_aware",
        }
    }

    /// Picks a consultant for a new session.
    ///
    /// `assignment_counter` is the balancer's monotonically increasing
    /// count of sessions placed so far; only round-robin reads it.
    /// Returns `None` when no consultant is available with spare capacity.
    pub fn select<'a>(
        &self,
        consultants: &'a BTreeMap<ConsultantId, Consultant>,
        request: &AssignRequest,
        assignment_counter: u64,
    ) -> Option<&'a ConsultantId> {
        match self {
            BalancingStrategy::LeastLoaded => least_loaded(consultants.values()),
            BalancingStrategy::RoundRobin => round_robin(consultants, assignment_counter),
            BalancingStrategy::SpecializationAware => {
                specialization_aware(consultants, request.required_specialization.as_deref())
            }
            BalancingStrategy::PriorityAware => {
                if request.priority.wants_headroom() {
                    most_headroom(consultants.values())
                } else {
                    least_loaded(consultants.values())
                }
            }
        }
    }
}

impl fmt::Display for BalancingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn by_load(a: &Consultant, b: &Consultant) -> Ordering {
    a.current_load().total_cmp(&b.current_load())
}

/// Lowest load wins; `min_by` keeps the first of equal elements.
fn least_loaded<'a>(candidates: impl Iterator<Item = &'a Consultant>) -> Option<&'a ConsultantId> {
    candidates
        .filter(|c| c.is_assignable())
        .min_by(|a, b| by_load(a, b))
        .map(Consultant::id)
}

fn round_robin(
    consultants: &BTreeMap<ConsultantId, Consultant>,
    assignment_counter: u64,
) -> Option<&ConsultantId> {
    let eligible: Vec<&ConsultantId> = consultants
        .values()
        .filter(|c| c.is_assignable())
        .map(Consultant::id)
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let index = (assignment_counter % eligible.len() as u64) as usize;
    eligible.get(index).copied()
}

fn specialization_aware<'a>(
    consultants: &'a BTreeMap<ConsultantId, Consultant>,
    tag: Option<&str>,
) -> Option<&'a ConsultantId> {
    let Some(tag) = tag else {
        return least_loaded(consultants.values());
    };
    least_loaded(consultants.values().filter(|c| c.has_specialization(tag)))
        .or_else(|| least_loaded(consultants.values()))
}

/// Most free slots wins, then lower load, then lowest identifier.
fn most_headroom<'a>(candidates: impl Iterator<Item = &'a Consultant>) -> Option<&'a ConsultantId> {
    candidates
        .filter(|c| c.is_assignable())
        .min_by(|a, b| b.spare_slots().cmp(&a.spare_slots()).then_with(|| by_load(a, b)))
        .map(Consultant::id)
}
