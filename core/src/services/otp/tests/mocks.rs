//! Hand-rolled mocks and a wiring harness for the OTP service tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_session::OtpPurpose;
use crate::errors::{IdentityError, NotifyError};
use crate::repositories::session::InMemorySessionStore;
use crate::services::identity::IdentityBinder;
use crate::services::otp::{
    Clock, CodeIssuer, ManualClock, OtpServiceConfig, SessionSweeper, Sha256CodeHasher, Verifier,
};

use super::super::traits::Notifier;

/// A delivered message captured by the mock notifier
#[derive(Debug, Clone)]
pub struct SentCode {
    pub destination: String,
    pub code: String,
    pub purpose: OtpPurpose,
}

/// Notifier that records every delivery; the test hook for plaintext codes
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<SentCode>>>,
    fail_next: AtomicBool,
    // Finished send_code calls, failures included; lets tests wait out
    // the background delivery task before asserting
    attempts: AtomicUsize,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail_next: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Yield until at least `n` delivery attempts have finished
    pub async fn wait_for_attempts(&self, n: usize) {
        for _ in 0..10_000 {
            if self.attempts.load(Ordering::SeqCst) >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("notifier never reached {} delivery attempts", n);
    }

    pub async fn last_code(&self) -> Option<String> {
        self.sent.read().await.last().map(|s| s.code.clone())
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_code(
        &self,
        destination: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<String, NotifyError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            return Err(NotifyError::Delivery {
                message: "simulated delivery failure".to_string(),
            });
        }
        self.sent.write().await.push(SentCode {
            destination: destination.to_string(),
            code: code.to_string(),
            purpose,
        });
        let id = format!("mock-{}", self.sent.read().await.len());
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }
}

/// Binder that records every invocation
pub struct RecordingBinder {
    pub verified: Arc<RwLock<Vec<String>>>,
    pub rotated: Arc<RwLock<Vec<(String, String)>>>,
}

impl RecordingBinder {
    pub fn new() -> Self {
        Self {
            verified: Arc::new(RwLock::new(Vec::new())),
            rotated: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn verified_count(&self) -> usize {
        self.verified.read().await.len()
    }
}

#[async_trait]
impl IdentityBinder for RecordingBinder {
    async fn mark_verified(&self, subject_id: &str) -> Result<(), IdentityError> {
        self.verified.write().await.push(subject_id.to_string());
        Ok(())
    }

    async fn rotate_credential(
        &self,
        subject_id: &str,
        new_value: &str,
    ) -> Result<(), IdentityError> {
        self.rotated
            .write()
            .await
            .push((subject_id.to_string(), new_value.to_string()));
        Ok(())
    }
}

/// Fully wired OTP services over in-memory collaborators
pub struct Harness {
    pub store: Arc<InMemorySessionStore>,
    pub notifier: Arc<MockNotifier>,
    pub binder: Arc<RecordingBinder>,
    pub clock: Arc<ManualClock>,
    pub issuer: CodeIssuer<InMemorySessionStore, MockNotifier>,
    pub verifier: Verifier<InMemorySessionStore, RecordingBinder>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(OtpServiceConfig::default())
    }

    pub fn with_config(config: OtpServiceConfig) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let binder = Arc::new(RecordingBinder::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let sweeper = Arc::new(SessionSweeper::new(
            Arc::clone(&store),
            config.sweep_batch_size,
        ));
        let hasher = Arc::new(Sha256CodeHasher);

        let issuer = CodeIssuer::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::clone(&sweeper),
            hasher.clone() as Arc<dyn crate::services::otp::CodeHasher>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            config.clone(),
        );
        let verifier = Verifier::new(
            Arc::clone(&store),
            sweeper,
            Arc::clone(&binder),
            hasher as Arc<dyn crate::services::otp::CodeHasher>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            config,
        );

        Self {
            store,
            notifier,
            binder,
            clock,
            issuer,
            verifier,
        }
    }

    /// Issue an email-verification code and return (handle, plaintext code)
    pub async fn issue_email(&self, subject: &str) -> (String, String) {
        self.issue_for(subject, OtpPurpose::EmailVerification).await
    }

    /// Issue a password-reset code and return (handle, plaintext code)
    pub async fn issue_reset(&self, subject: &str) -> (String, String) {
        self.issue_for(subject, OtpPurpose::PasswordReset).await
    }

    async fn issue_for(&self, subject: &str, purpose: OtpPurpose) -> (String, String) {
        let target = self.notifier.attempt_count() + 1;
        let issued = self
            .issuer
            .issue(subject, "seller@example.com", purpose, None)
            .await
            .unwrap();
        // Delivery runs on a spawned task; wait for it before reading
        // the recorded code back
        self.notifier.wait_for_attempts(target).await;
        let code = self.notifier.last_code().await.unwrap();
        (issued.handle, code)
    }
}
