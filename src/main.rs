//! Consultant Balancer service entry point.
//!
//! Loads configuration, provisions the roster and runs the idle-session
//! reclaimer until Ctrl-C. Request handling layers embed the library and
//! talk to the balancer through the `SessionAssigner` port.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use consultant_balancer::application::{ConsultantBalancer, SessionReclaimer};
use consultant_balancer::config::AppConfig;
use consultant_balancer::ports::SessionAssigner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.logging.init()?;
    config.validate()?;

    let balancer = Arc::new(ConsultantBalancer::new(config.balancer_config())?);
    let reclaimer = SessionReclaimer::with_config(balancer.clone(), config.reclaimer_config());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reclaimer_task = tokio::spawn(async move { reclaimer.run(shutdown_rx).await });

    info!(
        consultants = config.roster.len(),
        session_timeout_secs = balancer.session_timeout().as_secs(),
        cleanup_interval_secs = config.balancer.cleanup_interval_secs,
        "Consultant balancer running"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }

    info!("Shutdown requested");
    shutdown_tx.send(true).ok();
    reclaimer_task.await?;

    let metrics = balancer.metrics().await;
    info!(
        total_sessions = metrics.total_sessions,
        active_sessions = metrics.active_sessions,
        rejected_sessions = metrics.rejected_sessions,
        average_load = metrics.average_load,
        "Final utilization"
    );

    Ok(())
}
