//! Consultant Balancer - session assignment and lifecycle engine
//!
//! Decides which capacity-bounded consultant handles each client session,
//! keeps sessions sticky to their consultant, reclaims sessions abandoned
//! by their client, and reports point-in-time utilization.

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
