//! ConsultantStatus enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of a consultant.
///
/// `Available` and `Busy` are derived from load on every mutation.
/// `Offline` is an administrative signal and is never derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultantStatus {
    Available,
    Busy,
    Offline,
}

impl ConsultantStatus {
    /// Derives the status implied by a load fraction.
    pub fn from_load(load: f64) -> Self {
        if load >= 1.0 {
            ConsultantStatus::Busy
        } else {
            ConsultantStatus::Available
        }
    }
}

impl fmt::Display for ConsultantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConsultantStatus::Available => "Available",
            ConsultantStatus::Busy => "Busy",
            ConsultantStatus::Offline => "Offline",
        };
        write!(f, "{}", s)
    }
}
