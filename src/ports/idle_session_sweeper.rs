//! IdleSessionSweeper port - one pass of idle-session reclamation.

use async_trait::async_trait;

/// Port driven by the background reclaimer.
///
/// A sweep runs to completion once started; callers only decide whether
/// to start the next one.
#[async_trait]
pub trait IdleSessionSweeper: Send + Sync {
    /// Reclaims every session idle past the timeout.
    ///
    /// Returns the number of sessions reclaimed.
    async fn sweep_idle_sessions(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_session_sweeper_is_object_safe() {
        fn _accepts_dyn(_sweeper: &dyn IdleSessionSweeper) {}
    }
}
