//! MySQL implementation of the session store.
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE otp_sessions (
//!     handle      VARCHAR(64)  NOT NULL PRIMARY KEY,
//!     subject_id  VARCHAR(128) NOT NULL,
//!     destination VARCHAR(320) NOT NULL,
//!     purpose     VARCHAR(32)  NOT NULL,
//!     code_hash   CHAR(64)     NOT NULL,
//!     salt        CHAR(32)     NOT NULL,
//!     attempts    INT UNSIGNED NOT NULL DEFAULT 0,
//!     created_at  DATETIME(3)  NOT NULL,
//!     expires_at  DATETIME(3)  NOT NULL,
//!     user_agent  TEXT         NULL,
//!     INDEX idx_subject_purpose (subject_id, purpose)
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::error;

use cg_core::domain::entities::otp_session::{OtpPurpose, OtpSession};
use cg_core::errors::StoreError;
use cg_core::repositories::session::{AttemptOutcome, SessionStore};

/// Session store backed by MySQL
///
/// The attempt increment runs inside a transaction with a `FOR UPDATE`
/// row lock, so concurrent wrong-code submissions serialize on the record
/// and the delete-at-ceiling happens atomically with the final count.
pub struct MySqlSessionStore {
    pool: MySqlPool,
}

impl MySqlSessionStore {
    /// Create a new store over the given pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::mysql::MySqlRow) -> Result<OtpSession, StoreError> {
        let purpose_raw: String = row.try_get("purpose").map_err(db_err)?;
        // One strict schema at the store boundary: an unknown purpose is a
        // corrupt row, not a default
        let purpose: OtpPurpose = purpose_raw.parse().map_err(|e: String| {
            error!(error = %e, "Rejecting session row with unknown purpose");
            StoreError::Backend { message: e }
        })?;

        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(db_err)?;
        let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(db_err)?;

        Ok(OtpSession {
            handle: row.try_get("handle").map_err(db_err)?,
            subject_id: row.try_get("subject_id").map_err(db_err)?,
            destination: row.try_get("destination").map_err(db_err)?,
            purpose,
            code_hash: row.try_get("code_hash").map_err(db_err)?,
            salt: row.try_get("salt").map_err(db_err)?,
            attempts: row.try_get::<u32, _>("attempts").map_err(db_err)?,
            created_at,
            expires_at,
            user_agent: row.try_get("user_agent").map_err(db_err)?,
        })
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend {
        message: e.to_string(),
    }
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn create(&self, session: &OtpSession) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO otp_sessions (
                handle, subject_id, destination, purpose,
                code_hash, salt, attempts, created_at, expires_at, user_agent
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&session.handle)
            .bind(&session.subject_id)
            .bind(&session.destination)
            .bind(session.purpose.as_str())
            .bind(&session.code_hash)
            .bind(&session.salt)
            .bind(session.attempts)
            .bind(session.created_at)
            .bind(session.expires_at)
            .bind(&session.user_agent)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db) = e {
                    if db.is_unique_violation() {
                        return StoreError::Conflict;
                    }
                }
                error!(error = %e, "Failed to create verification session");
                db_err(e)
            })?;

        Ok(())
    }

    async fn get(&self, handle: &str) -> Result<Option<OtpSession>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT handle, subject_id, destination, purpose,
                   code_hash, salt, attempts, created_at, expires_at, user_agent
            FROM otp_sessions
            WHERE handle = ?
            "#,
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch verification session");
            db_err(e)
        })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn increment_attempts(
        &self,
        handle: &str,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query("SELECT attempts FROM otp_sessions WHERE handle = ? FOR UPDATE")
            .bind(handle)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(db_err)?;
            return Ok(AttemptOutcome::NotFound);
        };

        let attempts: u32 = row.try_get("attempts").map_err(db_err)?;
        let new_count = attempts + 1;

        if new_count >= max_attempts {
            // Delete at the ceiling inside the same transaction; no record
            // is ever observable at attempts >= max_attempts
            sqlx::query("DELETE FROM otp_sessions WHERE handle = ?")
                .bind(handle)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            tx.commit().await.map_err(db_err)?;
            Ok(AttemptOutcome::Exhausted(new_count))
        } else {
            sqlx::query("UPDATE otp_sessions SET attempts = ? WHERE handle = ?")
                .bind(new_count)
                .bind(handle)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            tx.commit().await.map_err(db_err)?;
            Ok(AttemptOutcome::Counted(new_count))
        }
    }

    async fn delete(&self, handle: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM otp_sessions WHERE handle = ?")
            .bind(handle)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete verification session");
                db_err(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_subject(
        &self,
        subject_id: &str,
        purpose: OtpPurpose,
        limit: u32,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM otp_sessions WHERE subject_id = ? AND purpose = ? LIMIT ?",
        )
        .bind(subject_id)
        .bind(purpose.as_str())
        .bind(limit)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to bulk-delete verification sessions");
            db_err(e)
        })?;

        Ok(result.rows_affected())
    }
}
