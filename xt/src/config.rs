//! [`CoreConfig`] (ambient stack addendum: "Configuration"): the one fully-resolved, immutable
//! config struct the core receives at startup. Environment-variable resolution happens exactly
//! once, in [`VenueCredentials::from_env`] - nothing downstream re-reads the process environment.

use rust_decimal::Decimal;
use std::{env, time::Duration};
use thiserror::Error;
use xt_arbitrage::state::DEFAULT_DELTA_TOLERANCE;

/// Raised resolving [`CoreConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(&'static str),

    #[error("environment variable {name} has an invalid value: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// One venue's API key pair.
#[derive(Clone)]
pub struct VenueCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for VenueCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenueCredentials")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .finish()
    }
}

impl VenueCredentials {
    /// Read `key_var`/`secret_var` from the process environment.
    pub fn from_env(key_var: &'static str, secret_var: &'static str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env::var(key_var).map_err(|_| ConfigError::MissingEnvVar(key_var))?,
            api_secret: env::var(secret_var).map_err(|_| ConfigError::MissingEnvVar(secret_var))?,
        })
    }
}

/// Per-venue REST pipeline tuning shared by every client (spec §4.5).
#[derive(Debug, Clone, Copy)]
pub struct RestPoolConfig {
    pub max_concurrent_private: usize,
    pub request_timeout: Duration,
}

impl Default for RestPoolConfig {
    fn default() -> Self {
        Self {
            max_concurrent_private: 10,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Fully-resolved configuration the core is constructed from. Never re-reads the environment after
/// [`CoreConfig::from_env`] returns.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub mexc_spot: VenueCredentials,
    pub gateio_spot: VenueCredentials,
    pub gateio_futures_usd: VenueCredentials,
    pub rest_pool: RestPoolConfig,
    pub delta_tolerance: Decimal,
    /// Orchestrator monitoring-loop period (spec §4.10 "tick").
    pub tick_period: chrono::Duration,
    /// Opaque downstream data-collector configuration the core never interprets (ambient stack
    /// addendum: "Configuration").
    pub collector_config: serde_json::Value,
}

impl CoreConfig {
    /// Resolve every venue credential from the environment:
    /// `MEXC_API_KEY`/`MEXC_SECRET_KEY`, `GATEIO_API_KEY`/`GATEIO_SECRET_KEY` (shared by spot and
    /// USDT-settled futures - Gate.io issues one key pair per account, not per product, spec §6).
    pub fn from_env() -> Result<Self, ConfigError> {
        let gateio = VenueCredentials::from_env("GATEIO_API_KEY", "GATEIO_SECRET_KEY")?;

        Ok(Self {
            mexc_spot: VenueCredentials::from_env("MEXC_API_KEY", "MEXC_SECRET_KEY")?,
            gateio_futures_usd: gateio.clone(),
            gateio_spot: gateio,
            rest_pool: RestPoolConfig::default(),
            delta_tolerance: DEFAULT_DELTA_TOLERANCE,
            tick_period: chrono::Duration::seconds(1),
            collector_config: serde_json::Value::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_var_is_reported_by_name() {
        // SAFETY (test-only): no other test in this process reads this key concurrently.
        unsafe {
            env::remove_var("XT_TEST_DOES_NOT_EXIST");
        }
        let err = VenueCredentials::from_env("XT_TEST_DOES_NOT_EXIST", "XT_TEST_DOES_NOT_EXIST_2")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("XT_TEST_DOES_NOT_EXIST")));
    }
}
