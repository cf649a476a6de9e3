//! Configuration module with business-specific sub-modules
//!
//! Configuration is organized into logical areas:
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection
//! - `identity` - Identity provider endpoint configuration
//! - `otp` - OTP policy (TTL, attempt budget, cookie settings)
//! - `server` - HTTP server configuration
//! - `smtp` - Outbound mail configuration

pub mod database;
pub mod environment;
pub mod identity;
pub mod otp;
pub mod server;
pub mod smtp;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use environment::Environment;
pub use identity::IdentityConfig;
pub use otp::OtpConfig;
pub use server::ServerConfig;
pub use smtp::SmtpConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// OTP policy configuration
    pub otp: OtpConfig,

    /// Identity provider configuration
    pub identity: IdentityConfig,

    /// Outbound mail configuration
    pub smtp: SmtpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            otp: OtpConfig::for_environment(env),
            identity: IdentityConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        Self {
            environment: env,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            otp: OtpConfig::from_env(env),
            identity: IdentityConfig::from_env(),
            smtp: SmtpConfig::from_env(),
        }
    }
}
