//! Configuration for the OTP services.

use crate::domain::entities::otp_session::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_SECONDS};

/// Default maximum records removed per sweep batch
pub const DEFAULT_SWEEP_BATCH_SIZE: u32 = 450;

/// Policy configuration shared by issuer, verifier and sweeper
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Seconds a code remains valid after issuance
    pub ttl_seconds: i64,
    /// Maximum wrong-code submissions before the session is destroyed
    pub max_attempts: u32,
    /// Maximum records removed per bulk-delete batch
    pub sweep_batch_size: u32,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            sweep_batch_size: DEFAULT_SWEEP_BATCH_SIZE,
        }
    }
}
