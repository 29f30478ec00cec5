use std::str::FromStr;

use anyhow::Context;
use odonto_core::settings::{
    AutomationSettings, DEFAULT_INACTIVITY_MINUTES, DEFAULT_NO_RESPONSE_MINUTES,
    DEFAULT_SUBSTATUS_TIMEOUT_MINUTES,
};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Default rule timers applied when a rule is created without one.
    pub automation: AutomationSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                             | Default                 |
    /// |-------------------------------------|-------------------------|
    /// | `HOST`                              | `0.0.0.0`               |
    /// | `PORT`                              | `3000`                  |
    /// | `CORS_ORIGINS`                      | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`              | `30`                    |
    /// | `DEFAULT_INACTIVITY_MINUTES`        | `1440`                  |
    /// | `DEFAULT_SUBSTATUS_TIMEOUT_MINUTES` | `60`                    |
    /// | `DEFAULT_NO_RESPONSE_MINUTES`       | `240`                   |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_or("PORT", 3000u16)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_or("REQUEST_TIMEOUT_SECS", 30u64)?;

        let automation = AutomationSettings {
            default_inactivity_minutes: env_or(
                "DEFAULT_INACTIVITY_MINUTES",
                DEFAULT_INACTIVITY_MINUTES,
            )?,
            default_substatus_timeout_minutes: env_or(
                "DEFAULT_SUBSTATUS_TIMEOUT_MINUTES",
                DEFAULT_SUBSTATUS_TIMEOUT_MINUTES,
            )?,
            default_no_response_minutes: env_or(
                "DEFAULT_NO_RESPONSE_MINUTES",
                DEFAULT_NO_RESPONSE_MINUTES,
            )?,
        };
        for (name, minutes) in [
            ("DEFAULT_INACTIVITY_MINUTES", automation.default_inactivity_minutes),
            (
                "DEFAULT_SUBSTATUS_TIMEOUT_MINUTES",
                automation.default_substatus_timeout_minutes,
            ),
            ("DEFAULT_NO_RESPONSE_MINUTES", automation.default_no_response_minutes),
        ] {
            anyhow::ensure!(minutes >= 1, "{name} must be at least 1, got {minutes}");
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            automation,
        })
    }
}

/// Read and parse `key`, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}
