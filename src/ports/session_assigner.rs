//! SessionAssigner port - the assignment API consumed by collaborators.
//!
//! Request intake, response generation and delivery layers only ever see
//! this trait, never the balancer's internals.

use async_trait::async_trait;

use crate::domain::balancing::{AssignRequest, AssignmentOutcome, BalancerError, BalancerMetrics};
use crate::domain::foundation::{ConsultantId, SessionId};

/// Port for placing sessions on consultants.
///
/// Implementations must ensure:
/// - Repeat requests for a tracked session return the original consultant
/// - No consultant is ever assigned beyond its capacity
/// - Rejection is returned immediately; nothing is queued or retried
#[async_trait]
pub trait SessionAssigner: Send + Sync {
    /// Places a new session or refreshes a tracked one.
    async fn assign_request(&self, request: AssignRequest) -> AssignmentOutcome;

    /// Two-argument form: session identifier and optional preferred consultant.
    async fn assign(
        &self,
        session_id: SessionId,
        preferred: Option<ConsultantId>,
    ) -> AssignmentOutcome {
        self.assign_request(AssignRequest::new(session_id).with_preferred(preferred))
            .await
    }

    /// Closes a session and frees its consultant slot.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is not tracked
    async fn release(&self, session_id: &SessionId) -> Result<(), BalancerError>;

    /// Point-in-time utilization snapshot.
    async fn metrics(&self) -> BalancerMetrics;
}
