//! Domain entities representing core business objects.

pub mod otp_session;

// Re-export commonly used types
pub use otp_session::{
    OtpPurpose, OtpSession, CODE_LENGTH, DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_SECONDS,
};
