//! Consultant module - capacity-bounded workers that sessions are assigned to.
//!
//! Consultants are provisioned once from a static roster. Their load and
//! status are derived from the active session set on every mutation.

mod aggregate;
mod profile;
mod status;

pub use aggregate::{Consultant, ConsultantSnapshot};
pub use profile::ConsultantProfile;
pub use status::ConsultantStatus;
