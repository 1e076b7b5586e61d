//! Application configuration module
//!
//! Type-safe configuration loading using the `config` and `dotenvy` crates.
//! Values come from an optional configuration file, then from environment
//! variables with the `CONSULTANT_BALANCER` prefix (nested values use `__`).
//! The consultant roster is a list and is normally supplied by the file.
//!
//! # Example
//!
//! ```no_run
//! use consultant_balancer::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("{} consultants on the roster", config.roster.len());
//! ```

mod balancer;
mod error;
mod logging;

pub use balancer::BalancerSettings;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::application::{BalancerConfig, ReclaimerConfig};
use crate::domain::consultant::ConsultantProfile;

/// Environment variable naming an optional configuration file.
pub const CONFIG_PATH_ENV: &str = "CONSULTANT_BALANCER_CONFIG";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Balancer tuning (capacity, timeouts, strategy)
    #[serde(default)]
    pub balancer: BalancerSettings,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Static consultant roster
    #[serde(default)]
    pub roster: Vec<ConsultantProfile>,
}

impl AppConfig {
    /// Load configuration from the file named by `CONSULTANT_BALANCER_CONFIG`
    /// (if set) and environment variables.
    ///
    /// # Environment Variable Format
    ///
    /// - `CONSULTANT_BALANCER__BALANCER__STRATEGY=round_robin` -> `balancer.strategy`
    /// - `CONSULTANT_BALANCER__LOGGING__JSON=true` -> `logging.json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or values cannot be
    /// parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(path.as_deref().map(Path::new))
    }

    /// Load configuration from an explicit file (if any) and the environment.
    ///
    /// Environment variables override values from the file.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("CONSULTANT_BALANCER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.balancer.validate()?;
        self.logging.validate()?;

        let mut seen = HashSet::new();
        for profile in &self.roster {
            profile.validate()?;
            if !seen.insert(&profile.id) {
                return Err(crate::domain::foundation::ValidationError::duplicate(
                    "consultant_id",
                    profile.id.as_str(),
                )
                .into());
            }
        }
        Ok(())
    }

    /// Construction parameters for the balancer.
    pub fn balancer_config(&self) -> BalancerConfig {
        BalancerConfig {
            max_sessions_per_consultant: self.balancer.max_sessions_per_consultant,
            session_timeout: self.balancer.session_timeout(),
            strategy: self.balancer.strategy,
            roster: self.roster.clone(),
        }
    }

    /// Construction parameters for the reclaimer.
    pub fn reclaimer_config(&self) -> ReclaimerConfig {
        ReclaimerConfig::default().with_interval(self.balancer.cleanup_interval())
    }
}
