//! Outbound mail configuration

use serde::{Deserialize, Serialize};
use std::env;

/// SMTP configuration for outbound verification mail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    pub host: String,

    /// SMTP username
    pub username: String,

    /// SMTP password
    pub password: String,

    /// Sender address for verification mail
    pub from_address: String,

    /// Whether to use the console mock notifier instead of SMTP
    #[serde(default)]
    pub use_mock: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            username: String::new(),
            password: String::new(),
            from_address: String::from("no-reply@codegate.local"),
            use_mock: true,
        }
    }
}

impl SmtpConfig {
    /// Load SMTP configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("SMTP_HOST").unwrap_or(defaults.host),
            username: env::var("SMTP_USERNAME").unwrap_or(defaults.username),
            password: env::var("SMTP_PASSWORD").unwrap_or(defaults.password),
            from_address: env::var("SMTP_FROM_ADDRESS").unwrap_or(defaults.from_address),
            use_mock: env::var("SMTP_USE_MOCK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.use_mock),
        }
    }
}
