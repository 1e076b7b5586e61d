//! Roster entries used to provision consultants at startup.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConsultantId, ValidationError};

/// Static description of one consultant on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultantProfile {
    pub id: ConsultantId,

    pub name: String,

    /// Per-consultant capacity. Falls back to the balancer-wide ceiling.
    #[serde(default)]
    pub capacity: Option<u32>,

    #[serde(default)]
    pub specializations: Vec<String>,

    /// Start the consultant in the `Offline` state.
    #[serde(default)]
    pub offline: bool,
}

impl ConsultantProfile {
    pub fn new(id: ConsultantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            capacity: None,
            specializations: Vec::new(),
            offline: false,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_specialization(mut self, tag: impl Into<String>) -> Self {
        self.specializations.push(tag.into());
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Rejects a capacity of zero, which would make load undefined.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(0) = self.capacity {
            return Err(ValidationError::out_of_range(
                format!("roster[{}].capacity", self.id),
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(())
    }
}
