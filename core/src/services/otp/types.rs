//! Result types for the OTP services.

use chrono::{DateTime, Utc};

/// Result of issuing a code
///
/// Carries everything the caller may learn about the new session. The
/// plaintext code never appears here; it travels only through the
/// notifier.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// Opaque handle referencing the new session
    pub handle: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}
