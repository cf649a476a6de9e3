//! Identity provider configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the external identity provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Base URL of the identity provider API
    pub base_url: String,

    /// API key for server-to-server calls
    pub api_key: String,

    /// Timeout for provider requests in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:9010"),
            api_key: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl IdentityConfig {
    /// Load identity provider configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("IDENTITY_BASE_URL").unwrap_or(defaults.base_url),
            api_key: env::var("IDENTITY_API_KEY").unwrap_or(defaults.api_key),
            request_timeout_secs: env::var("IDENTITY_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}
