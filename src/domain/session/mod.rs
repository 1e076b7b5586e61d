//! Session module - client sessions tracked by the balancer.

mod aggregate;

pub use aggregate::Session;
