//! Code issuance: generation, supersession, persistence and delivery.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use std::sync::Arc;
use tracing::{info, warn};

use cg_shared::utils::email::mask_email;

use crate::domain::entities::otp_session::{OtpPurpose, OtpSession};
use crate::errors::OtpResult;
use crate::repositories::session::SessionStore;

use super::clock::Clock;
use super::config::OtpServiceConfig;
use super::hasher::CodeHasher;
use super::sweeper::SessionSweeper;
use super::traits::Notifier;
use super::types::IssuedCode;

/// Generate an opaque session handle (24 random bytes, hex-encoded)
pub fn generate_handle() -> String {
    let mut bytes = [0u8; 24];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issues verification codes
///
/// Issuing sweeps every prior session the subject holds for the same
/// purpose before creating the new one, so only the newest code is ever
/// valid. Delivery is handed to a background task and is best-effort.
pub struct CodeIssuer<S: SessionStore, N: Notifier> {
    store: Arc<S>,
    notifier: Arc<N>,
    sweeper: Arc<SessionSweeper<S>>,
    hasher: Arc<dyn CodeHasher>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<S: SessionStore, N: Notifier + 'static> CodeIssuer<S, N> {
    /// Create a new issuer
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        sweeper: Arc<SessionSweeper<S>>,
        hasher: Arc<dyn CodeHasher>,
        clock: Arc<dyn Clock>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            sweeper,
            hasher,
            clock,
            config,
        }
    }

    /// Issue a new code for a subject
    ///
    /// Returns the handle the caller will present at verify time. The
    /// plaintext code travels only through the notifier.
    pub async fn issue(
        &self,
        subject_id: &str,
        destination: &str,
        purpose: OtpPurpose,
        user_agent: Option<String>,
    ) -> OtpResult<IssuedCode> {
        let code = Self::generate_code();
        let salt = Self::generate_salt();
        let code_hash = self.hasher.hash(&salt, &code);
        let handle = generate_handle();

        // Supersession: every older session for this subject and purpose
        // dies before the new one is created. A crash between the sweep
        // and the create leaves zero valid sessions, which fails closed.
        self.sweeper.sweep(subject_id, purpose).await?;

        let now = self.clock.now();
        let session = OtpSession::new(
            handle.clone(),
            subject_id.to_string(),
            destination.to_string(),
            purpose,
            code_hash,
            salt,
            now,
            self.config.ttl_seconds,
            user_agent,
        );
        self.store.create(&session).await?;

        info!(
            subject_id = subject_id,
            destination = %mask_email(destination),
            purpose = %purpose,
            handle_prefix = &handle[..8],
            event = "otp_issued",
            "Issued verification code"
        );

        // Delivery runs off the issuing path: the response returns as soon
        // as the session is committed, so latency never reveals whether a
        // real send happened. A failed send never rolls back the session;
        // the caller resends by issuing again.
        let notifier = Arc::clone(&self.notifier);
        let delivery_destination = destination.to_string();
        tokio::spawn(async move {
            if let Err(e) = notifier
                .send_code(&delivery_destination, &code, purpose)
                .await
            {
                warn!(
                    destination = %mask_email(&delivery_destination),
                    purpose = %purpose,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );
            }
        });

        Ok(IssuedCode {
            handle,
            expires_at: session.expires_at,
        })
    }

    /// Generate a uniformly random 6-digit code, leading zeros included
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        let code: u32 = rng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    /// Generate a fresh per-session salt (16 random bytes, hex-encoded)
    pub fn generate_salt() -> String {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
