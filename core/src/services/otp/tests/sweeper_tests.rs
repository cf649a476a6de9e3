//! Tests for batched session sweeping.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::entities::otp_session::{OtpPurpose, OtpSession};
use crate::repositories::session::{InMemorySessionStore, SessionStore};
use crate::services::otp::SessionSweeper;

async fn seed(store: &InMemorySessionStore, subject: &str, purpose: OtpPurpose, count: usize) {
    for i in 0..count {
        let session = OtpSession::new(
            format!("{}-{}-{}", subject, purpose, i),
            subject.to_string(),
            "seller@example.com".to_string(),
            purpose,
            "hash".to_string(),
            "salt".to_string(),
            Utc::now(),
            600,
            None,
        );
        store.create(&session).await.unwrap();
    }
}

#[tokio::test]
async fn test_sweep_empty_store_is_noop() {
    let store = Arc::new(InMemorySessionStore::new());
    let sweeper = SessionSweeper::new(Arc::clone(&store), 450);

    let removed = sweeper
        .sweep("u1", OtpPurpose::EmailVerification)
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn test_sweep_spans_multiple_batches() {
    // More records than one batch ceiling; the sweeper must loop
    let store = Arc::new(InMemorySessionStore::new());
    seed(&store, "u1", OtpPurpose::EmailVerification, 1100).await;

    let sweeper = SessionSweeper::new(Arc::clone(&store), 450);
    let removed = sweeper
        .sweep("u1", OtpPurpose::EmailVerification)
        .await
        .unwrap();

    assert_eq!(removed, 1100);
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn test_sweep_exact_batch_multiple() {
    // A count landing exactly on the batch boundary needs one extra
    // empty batch to terminate
    let store = Arc::new(InMemorySessionStore::new());
    seed(&store, "u1", OtpPurpose::EmailVerification, 900).await;

    let sweeper = SessionSweeper::new(Arc::clone(&store), 450);
    let removed = sweeper
        .sweep("u1", OtpPurpose::EmailVerification)
        .await
        .unwrap();

    assert_eq!(removed, 900);
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn test_sweep_is_scoped_to_subject_and_purpose() {
    let store = Arc::new(InMemorySessionStore::new());
    seed(&store, "u1", OtpPurpose::EmailVerification, 3).await;
    seed(&store, "u1", OtpPurpose::PasswordReset, 2).await;
    seed(&store, "u2", OtpPurpose::EmailVerification, 4).await;

    let sweeper = SessionSweeper::new(Arc::clone(&store), 450);
    let removed = sweeper
        .sweep("u1", OtpPurpose::EmailVerification)
        .await
        .unwrap();

    assert_eq!(removed, 3);
    assert_eq!(store.session_count().await, 6);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let store = Arc::new(InMemorySessionStore::new());
    seed(&store, "u1", OtpPurpose::EmailVerification, 5).await;

    let sweeper = SessionSweeper::new(Arc::clone(&store), 450);
    assert_eq!(
        sweeper.sweep("u1", OtpPurpose::EmailVerification).await.unwrap(),
        5
    );
    assert_eq!(
        sweeper.sweep("u1", OtpPurpose::EmailVerification).await.unwrap(),
        0
    );
}
