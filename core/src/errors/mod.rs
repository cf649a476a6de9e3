//! Error taxonomy for the OTP verification core.
//!
//! Every operation's outcome is a typed value; nothing in this core relies
//! on stack unwinding for control decisions. Security-relevant failures
//! merge "never existed", "expired" and "already consumed" into a single
//! `SessionInvalid` variant so responses cannot act as an oracle; only
//! internal logs record the true cause.

use thiserror::Error;

/// Errors surfaced by a [`SessionStore`](crate::repositories::SessionStore) backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate session handle")]
    Conflict,

    #[error("Store backend failure: {message}")]
    Backend { message: String },
}

/// Errors surfaced by a [`Notifier`](crate::services::otp::Notifier)
///
/// Delivery is best-effort: these are logged by the issuer and never fail
/// an already-created session.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Destination rejected by the delivery provider")]
    InvalidDestination,

    #[error("Delivery failure: {message}")]
    Delivery { message: String },
}

/// Errors surfaced by the identity provider seam
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Caller token missing or invalid")]
    InvalidToken,

    #[error("Subject not found")]
    SubjectNotFound,

    #[error("Identity provider failure: {message}")]
    Provider { message: String },
}

/// Unified error type for OTP operations
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid value for field: {field}")]
    Validation { field: String },

    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Session does not belong to the caller")]
    Forbidden,

    #[error("Invalid or expired verification session")]
    SessionInvalid,

    #[error("Incorrect verification code")]
    CodeMismatch,

    #[error("Too many attempts")]
    TooManyAttempts,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Identity(IdentityError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<IdentityError> for OtpError {
    fn from(err: IdentityError) -> Self {
        match err {
            // A rejected caller token is an authentication failure, not a
            // provider outage
            IdentityError::InvalidToken => OtpError::Unauthenticated,
            other => OtpError::Identity(other),
        }
    }
}

pub type OtpResult<T> = Result<T, OtpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_maps_to_unauthenticated() {
        let err: OtpError = IdentityError::InvalidToken.into();
        assert!(matches!(err, OtpError::Unauthenticated));
    }

    #[test]
    fn test_provider_failure_stays_identity() {
        let err: OtpError = IdentityError::Provider {
            message: "timeout".to_string(),
        }
        .into();
        assert!(matches!(err, OtpError::Identity(_)));
    }

    #[test]
    fn test_store_error_conversion() {
        let err: OtpError = StoreError::Backend {
            message: "connection reset".to_string(),
        }
        .into();
        assert!(matches!(err, OtpError::Store(_)));
    }

    #[test]
    fn test_session_invalid_message_is_generic() {
        // The caller-facing message must not reveal why the session is gone
        assert_eq!(
            OtpError::SessionInvalid.to_string(),
            "Invalid or expired verification session"
        );
    }
}
