use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

/// Timeout/retry knobs forwarded into the availability ledger.
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    #[serde(default = "default_store_timeout")]
    pub store_timeout_seconds: u64,
    #[serde(default = "default_read_retries")]
    pub read_retries: u32,
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_millis: u64,
    /// How often the completion worker sweeps elapsed bookings.
    #[serde(default = "default_sweep_interval")]
    pub completion_sweep_seconds: u64,
}

fn default_store_timeout() -> u64 {
    10
}

fn default_read_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    100
}

fn default_sweep_interval() -> u64 {
    300
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment file, selected by RUN_MODE
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Env overrides, e.g. DRIVESHARE__SERVER__PORT=8080
            .add_source(config::Environment::with_prefix("DRIVESHARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
