//! Batched deletion of a subject's verification sessions.

use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::otp_session::OtpPurpose;
use crate::errors::OtpResult;
use crate::repositories::session::SessionStore;

/// Removes every session a subject holds for one purpose
///
/// Used by the issuer for supersession and by the verifier for
/// post-success cleanup. Deletions run in sequential batches bounded by
/// the configured batch size so backend bulk-operation ceilings are
/// respected; calling it when zero records match is a no-op.
pub struct SessionSweeper<S: SessionStore> {
    store: Arc<S>,
    batch_size: u32,
}

impl<S: SessionStore> SessionSweeper<S> {
    /// Create a sweeper over the given store
    pub fn new(store: Arc<S>, batch_size: u32) -> Self {
        Self { store, batch_size }
    }

    /// Delete all sessions for a subject and purpose; returns the count
    ///
    /// Idempotent: a second sweep for the same subject returns zero.
    pub async fn sweep(&self, subject_id: &str, purpose: OtpPurpose) -> OtpResult<u64> {
        let mut total = 0u64;
        loop {
            let removed = self
                .store
                .delete_for_subject(subject_id, purpose, self.batch_size)
                .await?;
            total += removed;
            if removed < u64::from(self.batch_size) {
                break;
            }
        }

        if total > 0 {
            debug!(
                subject_id = subject_id,
                purpose = %purpose,
                removed = total,
                event = "sessions_swept",
                "Removed verification sessions for subject"
            );
        }
        Ok(total)
    }
}
