//! SMTP notifier built on lettre's async transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};
use uuid::Uuid;

use cg_core::domain::entities::otp_session::OtpPurpose;
use cg_core::errors::NotifyError;
use cg_core::services::otp::Notifier;
use cg_shared::config::SmtpConfig;
use cg_shared::utils::email::mask_email;

use super::{body_for, subject_for};

/// Notifier that delivers codes through an SMTP relay
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    /// Create a notifier from SMTP configuration
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| NotifyError::Delivery {
                message: format!("SMTP relay setup failed: {}", e),
            })?
            .credentials(creds)
            .build();

        info!(host = %config.host, "SMTP notifier initialized");

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_code(
        &self,
        destination: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<String, NotifyError> {
        let to = destination
            .parse()
            .map_err(|_| NotifyError::InvalidDestination)?;
        let from = self
            .from_address
            .parse()
            .map_err(|_| NotifyError::InvalidDestination)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject_for(purpose))
            .header(ContentType::TEXT_PLAIN)
            .body(body_for(purpose, code))
            .map_err(|e| NotifyError::Delivery {
                message: format!("Failed to build message: {}", e),
            })?;

        self.mailer.send(message).await.map_err(|e| {
            error!(
                destination = %mask_email(destination),
                error = %e,
                "SMTP delivery failed"
            );
            NotifyError::Delivery {
                message: e.to_string(),
            }
        })?;

        let message_id = format!("smtp-{}", Uuid::new_v4());
        debug!(
            destination = %mask_email(destination),
            message_id = %message_id,
            "Delivered verification code"
        );
        Ok(message_id)
    }
}
