//! Adapter exposing any identity provider as an [`IdentityBinder`].

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::errors::IdentityError;

use super::traits::{IdentityBinder, IdentityProvider};

/// Binder backed by an [`IdentityProvider`]
///
/// Both operations map to provider calls that overwrite absolute state
/// (verified flag, password value), so retrying after a crash is safe.
pub struct ProviderIdentityBinder<P: IdentityProvider> {
    provider: Arc<P>,
}

impl<P: IdentityProvider> ProviderIdentityBinder<P> {
    /// Create a binder over the given provider
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: IdentityProvider> IdentityBinder for ProviderIdentityBinder<P> {
    async fn mark_verified(&self, subject_id: &str) -> Result<(), IdentityError> {
        self.provider.set_verified(subject_id).await?;
        info!(subject_id = subject_id, event = "subject_verified", "Marked subject as verified");
        Ok(())
    }

    async fn rotate_credential(
        &self,
        subject_id: &str,
        new_value: &str,
    ) -> Result<(), IdentityError> {
        self.provider.set_password(subject_id, new_value).await?;
        info!(subject_id = subject_id, event = "credential_rotated", "Rotated subject credential");
        Ok(())
    }
}
