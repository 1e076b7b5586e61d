//! Balancing module - deciding which consultant handles a session.
//!
//! - `strategy` - the four interchangeable selection policies
//! - `registry` - session and consultant bookkeeping
//! - `state` - registry + counters + strategy, mutated atomically
//! - `metrics` - utilization snapshot

mod assignment;
mod errors;
mod metrics;
mod registry;
mod state;
mod strategy;

pub use assignment::{AssignRequest, AssignmentOutcome};
pub use errors::BalancerError;
pub use metrics::{BalancerMetrics, SessionCounters};
pub use registry::Registry;
pub use state::BalancerState;
pub use strategy::BalancingStrategy;
