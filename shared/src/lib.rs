//! Shared utilities and common types for the CodeGate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response structures
//! - Utility functions (email validation, masking, etc.)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, IdentityConfig, OtpConfig, ServerConfig, SmtpConfig,
};
pub use types::response::{ErrorBody, OkBody};
pub use utils::email;
