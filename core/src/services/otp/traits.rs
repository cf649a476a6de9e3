//! Delivery seam for issued codes.

use async_trait::async_trait;

use crate::domain::entities::otp_session::OtpPurpose;
use crate::errors::NotifyError;

/// Delivery channel for plaintext codes
///
/// Delivery is best-effort and decoupled from session commit: the issuer
/// logs a failure and keeps the already-created session valid. A "resend"
/// is a fresh `issue` call, which supersedes the undelivered code.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a code to a destination; returns a provider message id
    async fn send_code(
        &self,
        destination: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<String, NotifyError>;
}
