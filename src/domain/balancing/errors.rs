//! Balancer error types.

use thiserror::Error;

use crate::domain::foundation::{ConsultantId, ErrorCode, SessionId, ValidationError};

/// Failures returned synchronously by the balancer.
///
/// Rejection for lack of capacity is not an error; see
/// [`AssignmentOutcome::Rejected`](super::AssignmentOutcome::Rejected).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalancerError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Consultant not found: {0}")]
    ConsultantNotFound(ConsultantId),

    #[error("Invalid balancer configuration: {0}")]
    InvalidConfiguration(ValidationError),

    #[error("Invalid session transition: {0}")]
    InvalidTransition(ValidationError),
}

impl BalancerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BalancerError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            BalancerError::ConsultantNotFound(_) => ErrorCode::ConsultantNotFound,
            BalancerError::InvalidConfiguration(_) => ErrorCode::ValidationFailed,
            BalancerError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
        }
    }
}

impl From<ValidationError> for BalancerError {
    fn from(err: ValidationError) -> Self {
        BalancerError::InvalidConfiguration(err)
    }
}
