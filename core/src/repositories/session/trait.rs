//! Session store interface for OTP verification sessions.

use async_trait::async_trait;

use crate::domain::entities::otp_session::{OtpPurpose, OtpSession};
use crate::errors::StoreError;

/// Result of an atomic attempt increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// No record exists for the handle (deleted, consumed or never created)
    NotFound,
    /// The counter advanced to the contained value, record still live
    Counted(u32),
    /// The counter reached the ceiling; the record was deleted in the same
    /// atomic operation
    Exhausted(u32),
}

/// Persistence interface for OTP sessions
///
/// Implementations must make `increment_attempts` a single atomic
/// read-modify-write on the addressed record: concurrent wrong-code
/// submissions serialize on that record, and no record is ever observable
/// with `attempts >= max_attempts`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session record
    ///
    /// The handle lives inside the session and is generated by the issuer.
    /// A duplicate handle is a [`StoreError::Conflict`].
    async fn create(&self, session: &OtpSession) -> Result<(), StoreError>;

    /// Fetch a session by handle
    async fn get(&self, handle: &str) -> Result<Option<OtpSession>, StoreError>;

    /// Atomically advance the attempt counter for a handle
    ///
    /// When the post-increment count reaches `max_attempts` the record is
    /// deleted inside the same operation and [`AttemptOutcome::Exhausted`]
    /// is returned.
    async fn increment_attempts(
        &self,
        handle: &str,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, StoreError>;

    /// Delete a session; idempotent
    ///
    /// Returns whether a record was actually removed. The `true` return is
    /// the consumption claim the verifier's success path relies on.
    async fn delete(&self, handle: &str) -> Result<bool, StoreError>;

    /// Delete up to `limit` sessions for a subject and purpose
    ///
    /// Returns the number of records removed. This is the paginated
    /// primitive the sweeper loops on; deleting zero records is not an
    /// error.
    async fn delete_for_subject(
        &self,
        subject_id: &str,
        purpose: OtpPurpose,
        limit: u32,
    ) -> Result<u64, StoreError>;
}
