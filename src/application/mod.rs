//! Application layer - the engine and its background service.
//!
//! - `balancer` - `ConsultantBalancer`, the lock-owning orchestrator
//! - `reclaimer` - `SessionReclaimer`, the periodic idle-session sweep

mod balancer;
mod reclaimer;

pub use balancer::{BalancerConfig, ConsultantBalancer};
pub use reclaimer::{ReclaimerConfig, SessionReclaimer};
