//! Background reclaimer wired to a real balancer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use consultant_balancer::application::{
    BalancerConfig, ConsultantBalancer, ReclaimerConfig, SessionReclaimer,
};
use consultant_balancer::domain::consultant::ConsultantProfile;
use consultant_balancer::domain::foundation::{ConsultantId, SessionId};
use consultant_balancer::ports::SessionAssigner;

fn balancer(timeout: Duration) -> Arc<ConsultantBalancer> {
    let config = BalancerConfig::default()
        .with_session_timeout(timeout)
        .with_consultant(ConsultantProfile::new(ConsultantId::new("C1").unwrap(), "Ada"))
        .with_consultant(ConsultantProfile::new(ConsultantId::new("C2").unwrap(), "Grace"));
    Arc::new(ConsultantBalancer::new(config).unwrap())
}

#[tokio::test]
async fn reclaimer_frees_capacity_in_background() {
    let balancer = balancer(Duration::from_millis(50));
    for n in 0..4 {
        let outcome = balancer
            .assign(SessionId::new(format!("s{n}")).unwrap(), None)
            .await;
        assert!(!outcome.is_rejected());
    }

    let reclaimer = SessionReclaimer::with_config(
        balancer.clone(),
        ReclaimerConfig::default().with_interval(Duration::from_millis(40)),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { reclaimer.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(300)).await;

    let metrics = balancer.metrics().await;
    assert_eq!(metrics.active_sessions, 0);
    assert_eq!(metrics.average_load, 0.0);
    assert_eq!(metrics.available_consultants, 2);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("reclaimer should stop after shutdown")
        .unwrap();
}

#[tokio::test]
async fn reclaimer_stops_without_sweeping_when_shutdown_first() {
    let balancer = balancer(Duration::from_millis(1));
    balancer
        .assign(SessionId::new("s1").unwrap(), None)
        .await;

    let reclaimer = SessionReclaimer::with_config(
        balancer.clone(),
        ReclaimerConfig::default().with_interval(Duration::from_secs(60)),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { reclaimer.run(shutdown_rx).await });

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("reclaimer should stop promptly")
        .unwrap();

    assert_eq!(balancer.metrics().await.active_sessions, 1);
}

#[tokio::test]
async fn dropping_the_sender_stops_the_reclaimer() {
    let reclaimer = SessionReclaimer::new(balancer(Duration::from_secs(60)));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { reclaimer.run(shutdown_rx).await });

    drop(shutdown_tx);
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("reclaimer should stop when the sender goes away")
        .unwrap();
}
