//! Assignment request and outcome types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConsultantId, SessionId, SessionPriority};

/// A request to place a session on a consultant.
///
/// Priority, specialization and metadata only matter the first time a
/// session identifier is seen; repeat requests just refresh activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub session_id: SessionId,
    #[serde(default)]
    pub preferred_consultant: Option<ConsultantId>,
    #[serde(default)]
    pub priority: SessionPriority,
    #[serde(default)]
    pub required_specialization: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl AssignRequest {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            preferred_consultant: None,
            priority: SessionPriority::Normal,
            required_specialization: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_preferred(mut self, consultant_id: Option<ConsultantId>) -> Self {
        self.preferred_consultant = consultant_id;
        self
    }

    pub fn with_priority(mut self, priority: SessionPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Blank tags are treated as "no requirement".
    pub fn with_specialization(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.required_specialization = if tag.trim().is_empty() { None } else { Some(tag) };
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Result of an assignment attempt.
///
/// Rejection is a normal outcome, not an error: the engine never queues
/// or retries, so the caller decides what to do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Assigned {
        consultant_id: ConsultantId,
        /// True when the session was already tracked and only refreshed.
        reused: bool,
    },
    Rejected,
}

impl AssignmentOutcome {
    /// Returns the consultant, or `None` on rejection.
    pub fn consultant_id(&self) -> Option<&ConsultantId> {
        match self {
            AssignmentOutcome::Assigned { consultant_id, .. } => Some(consultant_id),
            AssignmentOutcome::Rejected => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, AssignmentOutcome::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_has_normal_priority_and_no_preference() {
        let req = AssignRequest::new(SessionId::new("s1").unwrap());
        assert_eq!(req.priority, SessionPriority::Normal);
        assert!(req.preferred_consultant.is_none());
        assert!(req.required_specialization.is_none());
    }

    #[test]
    fn blank_specialization_means_none() {
        let req = AssignRequest::new(SessionId::new("s1").unwrap()).with_specialization("  ");
        assert!(req.required_specialization.is_none());
    }

    #[test]
    fn rejected_outcome_has_no_consultant() {
        assert!(AssignmentOutcome::Rejected.consultant_id().is_none());
        assert!(AssignmentOutcome::Rejected.is_rejected());
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let outcome = AssignmentOutcome::Assigned {
            consultant_id: ConsultantId::new("c1").unwrap(),
            reused: false,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "assigned");
        assert_eq!(json["consultant_id"], "c1");
    }
}
