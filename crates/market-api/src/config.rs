//! Configuration for the marketplace API.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Token signing configuration. No default: the service refuses to
    /// start without a signing secret.
    pub auth: AuthConfig,

    /// OTP configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Bearer-token signing secret
    pub jwt_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// How long an issued code stays valid
    #[serde(with = "humantime_serde", default = "default_otp_ttl")]
    pub ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl: default_otp_ttl(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_otp_ttl() -> Duration {
    Duration::from_secs(20 * 60)
}

fn default_global_rpm() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Variables use a `__` separator, e.g. `SERVER__PORT=5000`,
    /// `AUTH__JWT_SECRET=...`, `OTP__TTL=20m`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_apply_when_sections_absent() {
        let config: Config =
            serde_json::from_value(json!({ "auth": { "jwt_secret": "test-secret" } })).unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.otp.ttl, Duration::from_secs(20 * 60));
        assert_eq!(config.rate_limit.global_per_minute, 60);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result: Result<Config, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_otp_ttl_parses_humantime() {
        let config: Config = serde_json::from_value(json!({
            "auth": { "jwt_secret": "test-secret" },
            "otp": { "ttl": "5m" }
        }))
        .unwrap();
        assert_eq!(config.otp.ttl, Duration::from_secs(300));
    }
}
