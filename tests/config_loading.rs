//! Loading configuration files and building a balancer from them.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use consultant_balancer::application::ConsultantBalancer;
use consultant_balancer::config::AppConfig;
use consultant_balancer::domain::balancing::{AssignRequest, BalancingStrategy};
use consultant_balancer::domain::consultant::ConsultantStatus;
use consultant_balancer::domain::foundation::{ConsultantId, SessionId};
use consultant_balancer::ports::SessionAssigner;

// Environment variables are process-global.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ROSTER: &str = r#"
[balancer]
max_sessions_per_consultant = 3
session_timeout_secs = 600
cleanup_interval_secs = 30
strategy = "specialization_aware"

[logging]
json = true

[[roster]]
id = "c1"
name = "Ada"

[[roster]]
id = "c2"
name = "Grace"
capacity = 2
specializations = ["tax", "audit"]

[[roster]]
id = "c3"
name = "Edsger"
offline = true
"#;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn roster_file_provisions_balancer() {
    let file = write_config(ROSTER);
    let config = {
        let _guard = ENV_MUTEX.lock().unwrap();
        AppConfig::load_from(Some(file.path())).unwrap()
    };
    config.validate().unwrap();

    assert_eq!(config.roster.len(), 3);
    assert!(config.logging.json);
    assert_eq!(config.reclaimer_config().interval, Duration::from_secs(30));
    assert_eq!(config.balancer_config().session_timeout, Duration::from_secs(600));

    let balancer = ConsultantBalancer::new(config.balancer_config()).unwrap();
    assert_eq!(balancer.strategy().await, BalancingStrategy::SpecializationAware);

    let c2 = balancer.consultant(&ConsultantId::new("c2").unwrap()).await.unwrap();
    assert_eq!(c2.max_sessions, 2);
    let c3 = balancer.consultant(&ConsultantId::new("c3").unwrap()).await.unwrap();
    assert_eq!(c3.status, ConsultantStatus::Offline);
    assert_eq!(c3.max_sessions, 3);

    let request = AssignRequest::new(SessionId::new("s1").unwrap()).with_specialization("audit");
    assert_eq!(
        balancer.assign_request(request).await.consultant_id(),
        Some(&ConsultantId::new("c2").unwrap())
    );
}

#[test]
fn environment_overrides_file_values() {
    let file = write_config(ROSTER);
    let result = {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("CONSULTANT_BALANCER__BALANCER__STRATEGY", "round_robin");
        let result = AppConfig::load_from(Some(file.path()));
        std::env::remove_var("CONSULTANT_BALANCER__BALANCER__STRATEGY");
        result
    };

    let config = result.unwrap();
    assert_eq!(config.balancer.strategy, BalancingStrategy::RoundRobin);
    assert_eq!(config.balancer.max_sessions_per_consultant, 3);
}

#[test]
fn missing_file_is_an_error() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(AppConfig::load_from(Some(&path)).is_err());
}

#[test]
fn zero_capacity_in_file_fails_validation() {
    let file = write_config(
        r#"
[[roster]]
id = "c1"
name = "Ada"
capacity = 0
"#,
    );
    let config = {
        let _guard = ENV_MUTEX.lock().unwrap();
        AppConfig::load_from(Some(file.path())).unwrap()
    };
    assert!(config.validate().is_err());
}

#[test]
fn unknown_strategy_fails_to_load() {
    let file = write_config(
        r#"
[balancer]
strategy = "random"
"#,
    );
    let _guard = ENV_MUTEX.lock().unwrap();
    assert!(AppConfig::load_from(Some(file.path())).is_err());
}
