//! Mock notifier for development and testing.
//!
//! Prints messages to the console instead of sending them, and records
//! every delivery so tests can read the plaintext code back.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use cg_core::domain::entities::otp_session::OtpPurpose;
use cg_core::errors::NotifyError;
use cg_core::services::otp::Notifier;
use cg_shared::utils::email::mask_email;

use super::{body_for, subject_for};

/// A message recorded by the mock notifier
#[derive(Debug, Clone)]
pub struct MockMessage {
    pub destination: String,
    pub code: String,
    pub purpose: OtpPurpose,
    pub message_id: String,
}

/// Console-backed notifier for development and tests
#[derive(Clone)]
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<MockMessage>>>,
    message_count: Arc<AtomicU64>,
    simulate_failure: Arc<AtomicBool>,
    console_output: bool,
}

impl MockNotifier {
    /// Create a new mock notifier with console output enabled
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(false)),
            console_output: true,
        }
    }

    /// Create a quiet mock for tests
    pub fn silent() -> Self {
        Self {
            console_output: false,
            ..Self::new()
        }
    }

    /// Total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Yield until at least `n` messages have been recorded
    ///
    /// Delivery runs on a task spawned by the issuer, so tests must wait
    /// for the recording before reading codes back.
    pub async fn wait_for_messages(&self, n: usize) {
        for _ in 0..10_000 {
            if self.sent.read().await.len() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("notifier never recorded {} messages", n);
    }

    /// The code of the most recently sent message
    pub async fn last_code(&self) -> Option<String> {
        self.sent.read().await.last().map(|m| m.code.clone())
    }

    /// All recorded messages
    pub async fn messages(&self) -> Vec<MockMessage> {
        self.sent.read().await.clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
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
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                destination = %mask_email(destination),
                "Mock notifier simulating delivery failure"
            );
            return Err(NotifyError::Delivery {
                message: "Simulated delivery failure".to_string(),
            });
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK NOTIFIER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", destination);
            println!("Subject: {}", subject_for(purpose));
            println!("{}", body_for(purpose, code));
            println!("{}\n", "=".repeat(60));
        }

        info!(
            provider = "mock",
            destination = %mask_email(destination),
            message_id = %message_id,
            purpose = %purpose,
            "Mock delivery recorded"
        );

        self.sent.write().await.push(MockMessage {
            destination: destination.to_string(),
            code: code.to_string(),
            purpose,
            message_id: message_id.clone(),
        });

        Ok(message_id)
    }
}
