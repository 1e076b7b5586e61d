//! Domain layer containing balancing logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, statuses, errors)
//! - `session` - Client sessions and their lifecycle
//! - `consultant` - Capacity-bounded consultants and roster entries
//! - `balancing` - Strategies, registry, state and metrics

pub mod balancing;
pub mod consultant;
pub mod foundation;
pub mod session;
