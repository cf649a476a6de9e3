//! OTP policy configuration

use serde::{Deserialize, Serialize};
use std::env;

use super::environment::Environment;

/// Name of the cookie carrying the verification session handle
pub const OTP_COOKIE_NAME: &str = "otp_sid";

/// OTP policy configuration
///
/// Covers the verification-session policy (code lifetime, attempt budget)
/// and the attributes of the session cookie the API layer issues.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Seconds a code remains valid after issuance
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,

    /// Maximum wrong-code submissions before the session is destroyed
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Maximum records removed per bulk-delete batch
    #[serde(default = "default_sweep_batch_size")]
    pub sweep_batch_size: u32,

    /// Cookie name for the session handle
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Whether the session cookie carries the Secure attribute
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_attempts: default_max_attempts(),
            sweep_batch_size: default_sweep_batch_size(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
        }
    }
}

impl OtpConfig {
    /// Create configuration appropriate for the given environment
    pub fn for_environment(env: Environment) -> Self {
        Self {
            cookie_secure: env.is_production(),
            ..Default::default()
        }
    }

    /// Load OTP configuration from environment variables
    pub fn from_env(env: Environment) -> Self {
        let defaults = Self::for_environment(env);
        Self {
            ttl_seconds: env_var("OTP_TTL_SECONDS").unwrap_or(defaults.ttl_seconds),
            max_attempts: env_var("OTP_MAX_ATTEMPTS").unwrap_or(defaults.max_attempts),
            sweep_batch_size: env_var("OTP_SWEEP_BATCH_SIZE").unwrap_or(defaults.sweep_batch_size),
            cookie_name: env::var("OTP_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            cookie_secure: defaults.cookie_secure,
        }
    }
}

fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn default_ttl_seconds() -> i64 {
    600
}

fn default_max_attempts() -> u32 {
    5
}

fn default_sweep_batch_size() -> u32 {
    450
}

fn default_cookie_name() -> String {
    OTP_COOKIE_NAME.to_string()
}
