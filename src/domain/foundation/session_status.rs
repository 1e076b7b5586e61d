//! SessionStatus enum for tracking the lifecycle of a consultant session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a consultant session.
///
/// ```text
/// Active --release--> Completed
/// Active --idle timeout--> TimedOut
/// ```
///
/// `Idle` is representable for collaborators that report it, but the
/// balancer itself never moves a session into it. Nothing returns to
/// `Active`: a new interaction needs a new session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Idle,
    Completed,
    TimedOut,
}

impl SessionStatus {
    /// Returns true while the session still holds consultant capacity.
    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Active | SessionStatus::Idle)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Active, Completed) | (Active, TimedOut) | (Idle, Completed) | (Idle, TimedOut)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Active | Idle => vec![Completed, TimedOut],
            Completed | TimedOut => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "Active",
            SessionStatus::Idle => "Idle",
            SessionStatus::Completed => "Completed",
            SessionStatus::TimedOut => "TimedOut",
        };
        write!(f, "{}", s)
    }
}
