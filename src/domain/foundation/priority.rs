//! Session priority tiers.

use serde::{Deserialize, Serialize};

/// Priority tier of a session, lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SessionPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl SessionPriority {
    /// Returns true if the priority-aware strategy should favour headroom.
    pub fn wants_headroom(&self) -> bool {
        matches!(self, SessionPriority::High | SessionPriority::Critical)
    }

    /// Returns the display name for this priority.
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionPriority::Low => "Low",
            SessionPriority::Normal => "Normal",
            SessionPriority::High => "High",
            SessionPriority::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for SessionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
