//! Ports - Interfaces between the engine and its collaborators.
//!
//! - `SessionAssigner` - assignment, release and metrics, consumed by the
//!   request layer and other collaborators
//! - `IdleSessionSweeper` - one reclamation pass, driven by the reclaimer

mod idle_session_sweeper;
mod session_assigner;

pub use idle_session_sweeper::IdleSessionSweeper;
pub use session_assigner::SessionAssigner;
