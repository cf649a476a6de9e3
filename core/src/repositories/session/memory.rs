//! In-memory session store for tests and development wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_session::{OtpPurpose, OtpSession};
use crate::errors::StoreError;

use super::trait_::{AttemptOutcome, SessionStore};

/// In-memory session store backed by a `HashMap`
///
/// All mutating operations take the single write lock, which gives the
/// same serialization guarantees the MySQL implementation gets from
/// row-level transactions.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, OtpSession>>>,
}

impl InMemorySessionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of live sessions, useful in tests
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &OtpSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.handle) {
            return Err(StoreError::Conflict);
        }
        sessions.insert(session.handle.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, handle: &str) -> Result<Option<OtpSession>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(handle).cloned())
    }

    async fn increment_attempts(
        &self,
        handle: &str,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, StoreError> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(handle) else {
            return Ok(AttemptOutcome::NotFound);
        };

        let new_count = session.attempts + 1;
        if new_count >= max_attempts {
            // Delete at the ceiling instead of leaving the record there
            sessions.remove(handle);
            Ok(AttemptOutcome::Exhausted(new_count))
        } else {
            session.attempts = new_count;
            Ok(AttemptOutcome::Counted(new_count))
        }
    }

    async fn delete(&self, handle: &str) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(handle).is_some())
    }

    async fn delete_for_subject(
        &self,
        subject_id: &str,
        purpose: OtpPurpose,
        limit: u32,
    ) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.write().await;
        let handles: Vec<String> = sessions
            .values()
            .filter(|s| s.subject_id == subject_id && s.purpose == purpose)
            .take(limit as usize)
            .map(|s| s.handle.clone())
            .collect();

        for handle in &handles {
            sessions.remove(handle);
        }
        Ok(handles.len() as u64)
    }
}
