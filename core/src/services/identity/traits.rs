//! Traits for identity provider integration.

use async_trait::async_trait;

use crate::errors::IdentityError;

/// External managed-identity provider
///
/// The provider authenticates callers and stores the final verified /
/// credential state. It is never called speculatively by this core.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate a caller token and return the subject it belongs to
    async fn verify_caller_token(&self, token: &str) -> Result<String, IdentityError>;

    /// Resolve a subject by email address, if one exists
    async fn lookup_subject_by_email(&self, email: &str) -> Result<Option<String>, IdentityError>;

    /// Mark a subject's email address as verified
    async fn set_verified(&self, subject_id: &str) -> Result<(), IdentityError>;

    /// Replace a subject's password
    async fn set_password(&self, subject_id: &str, new_password: &str)
        -> Result<(), IdentityError>;
}

/// One-time side effect fired by the verifier after a successful match
///
/// Invoked only once per consumed session. Implementations must be
/// effectively idempotent: a retried call after a crash must not corrupt
/// state.
#[async_trait]
pub trait IdentityBinder: Send + Sync {
    /// Record that the subject's email address is verified
    async fn mark_verified(&self, subject_id: &str) -> Result<(), IdentityError>;

    /// Rotate the subject's credential to the given value
    async fn rotate_credential(
        &self,
        subject_id: &str,
        new_value: &str,
    ) -> Result<(), IdentityError>;
}
