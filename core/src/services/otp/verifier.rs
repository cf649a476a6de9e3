//! Verification: policy enforcement, consumption and the identity side
//! effect.

use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::otp_session::{OtpPurpose, OtpSession, CODE_LENGTH};
use crate::errors::{OtpError, OtpResult};
use crate::repositories::session::{AttemptOutcome, SessionStore};
use crate::services::identity::IdentityBinder;

use super::clock::Clock;
use super::config::OtpServiceConfig;
use super::hasher::CodeHasher;
use super::sweeper::SessionSweeper;

/// Minimum accepted length for a replacement password
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates a (handle, code) pair against stored state
///
/// Policy, in order: existence, purpose, subject binding, expiry, attempt
/// budget, constant-time hash comparison. A mismatch burns one attempt
/// atomically; a match claims the record via its deletion, sweeps the
/// subject's siblings and fires the identity binder exactly once.
pub struct Verifier<S: SessionStore, B: IdentityBinder> {
    store: Arc<S>,
    sweeper: Arc<SessionSweeper<S>>,
    binder: Arc<B>,
    hasher: Arc<dyn CodeHasher>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<S: SessionStore, B: IdentityBinder> Verifier<S, B> {
    /// Create a new verifier
    pub fn new(
        store: Arc<S>,
        sweeper: Arc<SessionSweeper<S>>,
        binder: Arc<B>,
        hasher: Arc<dyn CodeHasher>,
        clock: Arc<dyn Clock>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            store,
            sweeper,
            binder,
            hasher,
            clock,
            config,
        }
    }

    /// Verify an email-verification code for an authenticated caller
    ///
    /// On success the subject is marked verified at the identity provider.
    pub async fn verify_email(
        &self,
        handle: &str,
        submitted_code: &str,
        caller_subject_id: &str,
    ) -> OtpResult<()> {
        let session = self
            .consume(
                handle,
                submitted_code,
                OtpPurpose::EmailVerification,
                Some(caller_subject_id),
            )
            .await?;

        self.binder.mark_verified(&session.subject_id).await?;
        Ok(())
    }

    /// Verify a password-reset code and rotate the credential
    ///
    /// The caller is unauthenticated; possession of the handle and the
    /// code is the proof of mailbox ownership.
    pub async fn verify_reset(
        &self,
        handle: &str,
        submitted_code: &str,
        new_password: &str,
    ) -> OtpResult<()> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(OtpError::Validation {
                field: "new_password".to_string(),
            });
        }

        let session = self
            .consume(handle, submitted_code, OtpPurpose::PasswordReset, None)
            .await?;

        self.binder
            .rotate_credential(&session.subject_id, new_password)
            .await?;
        Ok(())
    }

    /// Shared policy path; returns the consumed session on success
    async fn consume(
        &self,
        handle: &str,
        submitted_code: &str,
        purpose: OtpPurpose,
        caller_subject_id: Option<&str>,
    ) -> OtpResult<OtpSession> {
        if submitted_code.len() != CODE_LENGTH
            || !submitted_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(OtpError::Validation {
                field: "code".to_string(),
            });
        }

        let Some(session) = self.store.get(handle).await? else {
            return Err(OtpError::SessionInvalid);
        };

        // A code from the other flow is indistinguishable from a dead
        // handle
        if session.purpose != purpose {
            return Err(OtpError::SessionInvalid);
        }

        // A wrong caller must not burn the legitimate owner's attempt
        // budget: no mutation, no deletion on this path
        if let Some(caller) = caller_subject_id {
            if session.subject_id != caller {
                warn!(
                    handle_prefix = &handle[..handle.len().min(8)],
                    event = "otp_subject_mismatch",
                    "Verification attempted by a different subject"
                );
                return Err(OtpError::Forbidden);
            }
        }

        let now = self.clock.now();
        if session.is_expired(now) {
            self.store.delete(handle).await?;
            info!(
                subject_id = %session.subject_id,
                handle_prefix = &handle[..handle.len().min(8)],
                event = "otp_expired",
                "Verification session expired"
            );
            return Err(OtpError::SessionInvalid);
        }

        // Normally unreachable: the increment path deletes the record at
        // the ceiling. Handles records written by older policy values.
        if session.is_exhausted(self.config.max_attempts) {
            self.store.delete(handle).await?;
            return Err(OtpError::TooManyAttempts);
        }

        let submitted_hash = self.hasher.hash(&session.salt, submitted_code);
        let matches = constant_time_eq(submitted_hash.as_bytes(), session.code_hash.as_bytes());

        if !matches {
            return match self
                .store
                .increment_attempts(handle, self.config.max_attempts)
                .await?
            {
                AttemptOutcome::Counted(count) => {
                    info!(
                        subject_id = %session.subject_id,
                        attempts = count,
                        event = "otp_code_mismatch",
                        "Wrong code submitted"
                    );
                    Err(OtpError::CodeMismatch)
                }
                AttemptOutcome::Exhausted(count) => {
                    warn!(
                        subject_id = %session.subject_id,
                        attempts = count,
                        event = "otp_attempts_exhausted",
                        "Attempt budget exhausted, session destroyed"
                    );
                    Err(OtpError::TooManyAttempts)
                }
                // Raced with a sweep or a concurrent consumption
                AttemptOutcome::NotFound => Err(OtpError::SessionInvalid),
            };
        }

        // The deletion is the consumption claim: whoever removes the
        // record owns the success path, so the binder fires at most once
        // per session even under concurrent correct submissions.
        if !self.store.delete(handle).await? {
            return Err(OtpError::SessionInvalid);
        }

        self.sweeper.sweep(&session.subject_id, purpose).await?;

        info!(
            subject_id = %session.subject_id,
            purpose = %purpose,
            event = "otp_verified",
            "Verification code accepted"
        );
        Ok(session)
    }
}
