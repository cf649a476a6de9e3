//! Tests for code issuance.

use std::collections::HashSet;

use crate::domain::entities::otp_session::{OtpPurpose, CODE_LENGTH};
use crate::repositories::session::SessionStore;
use crate::services::otp::CodeIssuer;

use super::mocks::{Harness, MockNotifier};

#[tokio::test]
async fn test_issue_creates_session_and_delivers_code() {
    let h = Harness::new();
    let issued = h
        .issuer
        .issue("u1", "seller@example.com", OtpPurpose::EmailVerification, Some("agent/1".into()))
        .await
        .unwrap();

    let session = h.store.get(&issued.handle).await.unwrap().unwrap();
    assert_eq!(session.subject_id, "u1");
    assert_eq!(session.purpose, OtpPurpose::EmailVerification);
    assert_eq!(session.attempts, 0);
    assert_eq!(session.expires_at, issued.expires_at);
    assert_eq!(session.user_agent.as_deref(), Some("agent/1"));
    assert_eq!(
        session.expires_at,
        session.created_at + chrono::Duration::seconds(600)
    );

    h.notifier.wait_for_attempts(1).await;
    let code = h.notifier.last_code().await.unwrap();
    assert_eq!(code.len(), CODE_LENGTH);

    // The code is stored only as a salted hash
    assert_ne!(session.code_hash, code);
    assert!(!session.code_hash.is_empty());
    assert_eq!(session.salt.len(), 32);
}

#[tokio::test]
async fn test_issue_supersedes_prior_sessions() {
    let h = Harness::new();
    let first = h
        .issuer
        .issue("u1", "seller@example.com", OtpPurpose::EmailVerification, None)
        .await
        .unwrap();
    let second = h
        .issuer
        .issue("u1", "seller@example.com", OtpPurpose::EmailVerification, None)
        .await
        .unwrap();

    assert!(h.store.get(&first.handle).await.unwrap().is_none());
    assert!(h.store.get(&second.handle).await.unwrap().is_some());
    assert_eq!(h.store.session_count().await, 1);
}

#[tokio::test]
async fn test_issue_does_not_touch_other_purpose() {
    let h = Harness::new();
    let reset = h
        .issuer
        .issue("u1", "seller@example.com", OtpPurpose::PasswordReset, None)
        .await
        .unwrap();
    h.issuer
        .issue("u1", "seller@example.com", OtpPurpose::EmailVerification, None)
        .await
        .unwrap();

    // The reset session survives an email-verification issuance
    assert!(h.store.get(&reset.handle).await.unwrap().is_some());
    assert_eq!(h.store.session_count().await, 2);
}

#[tokio::test]
async fn test_delivery_failure_keeps_session_valid() {
    let h = Harness::new();
    h.notifier.fail_next();

    let issued = h
        .issuer
        .issue("u1", "seller@example.com", OtpPurpose::EmailVerification, None)
        .await
        .unwrap();

    // The session exists even though nothing was delivered
    h.notifier.wait_for_attempts(1).await;
    assert!(h.store.get(&issued.handle).await.unwrap().is_some());
    assert_eq!(h.notifier.sent_count().await, 0);
}

#[tokio::test]
async fn test_issue_returns_without_waiting_on_delivery() {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::errors::NotifyError;
    use crate::repositories::session::InMemorySessionStore;
    use crate::services::otp::{
        Clock, OtpServiceConfig, SessionSweeper, Sha256CodeHasher, SystemClock,
    };

    use super::super::traits::Notifier;

    // A notifier whose send never completes, standing in for a hung relay
    struct StalledNotifier;

    #[async_trait::async_trait]
    impl Notifier for StalledNotifier {
        async fn send_code(
            &self,
            _destination: &str,
            _code: &str,
            _purpose: OtpPurpose,
        ) -> Result<String, NotifyError> {
            std::future::pending().await
        }
    }

    let store = Arc::new(InMemorySessionStore::new());
    let config = OtpServiceConfig::default();
    let sweeper = Arc::new(SessionSweeper::new(
        Arc::clone(&store),
        config.sweep_batch_size,
    ));
    let issuer = CodeIssuer::new(
        Arc::clone(&store),
        Arc::new(StalledNotifier),
        sweeper,
        Arc::new(Sha256CodeHasher),
        Arc::new(SystemClock) as Arc<dyn Clock>,
        config,
    );

    // Issuance must commit the session and return even though the
    // delivery will never finish
    let issued = tokio::time::timeout(
        Duration::from_secs(5),
        issuer.issue("u1", "seller@example.com", OtpPurpose::EmailVerification, None),
    )
    .await
    .expect("issuance blocked on delivery")
    .unwrap();

    assert!(store.get(&issued.handle).await.unwrap().is_some());
}

#[test]
fn test_generated_codes_are_six_digits() {
    for _ in 0..200 {
        let code = CodeIssuer::<
            crate::repositories::session::InMemorySessionStore,
            MockNotifier,
        >::generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn test_handles_are_opaque_and_unique() {
    let handles: HashSet<String> = (0..100)
        .map(|_| crate::services::otp::generate_handle())
        .collect();
    assert_eq!(handles.len(), 100);
    for handle in &handles {
        assert_eq!(handle.len(), 48);
        assert!(handle.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
