//! HTTP client for the managed identity provider.
//!
//! Bearer-authenticated REST calls with a bounded timeout and no retries;
//! a failed call surfaces as an [`IdentityError`] for the caller to map.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use cg_core::errors::IdentityError;
use cg_core::services::identity::IdentityProvider;
use cg_shared::config::IdentityConfig;

#[derive(Serialize)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct SubjectResponse {
    subject_id: String,
}

#[derive(Serialize)]
struct SetPasswordRequest<'a> {
    password: &'a str,
}

/// Identity provider reached over HTTP
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    /// Create a client from configuration
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| IdentityError::Provider {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        info!(base_url = %config.base_url, "Identity provider client initialized");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn provider_err(context: &str, e: reqwest::Error) -> IdentityError {
        error!(error = %e, "Identity provider call failed: {}", context);
        IdentityError::Provider {
            message: format!("{}: {}", context, e),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_caller_token(&self, token: &str) -> Result<String, IdentityError> {
        let response = self
            .client
            .post(self.endpoint("/v1/tokens/verify"))
            .bearer_auth(&self.api_key)
            .json(&VerifyTokenRequest { token })
            .send()
            .await
            .map_err(|e| Self::provider_err("verify token", e))?;

        match response.status() {
            StatusCode::OK => {
                let body: SubjectResponse = response
                    .json()
                    .await
                    .map_err(|e| Self::provider_err("decode subject", e))?;
                Ok(body.subject_id)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                Err(IdentityError::InvalidToken)
            }
            status => Err(IdentityError::Provider {
                message: format!("verify token returned {}", status),
            }),
        }
    }

    async fn lookup_subject_by_email(&self, email: &str) -> Result<Option<String>, IdentityError> {
        let response = self
            .client
            .get(self.endpoint("/v1/subjects"))
            .query(&[("email", email)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Self::provider_err("lookup subject", e))?;

        match response.status() {
            StatusCode::OK => {
                let body: SubjectResponse = response
                    .json()
                    .await
                    .map_err(|e| Self::provider_err("decode subject", e))?;
                Ok(Some(body.subject_id))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(IdentityError::Provider {
                message: format!("lookup subject returned {}", status),
            }),
        }
    }

    async fn set_verified(&self, subject_id: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(self.endpoint(&format!("/v1/subjects/{}/verified", subject_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Self::provider_err("set verified", e))?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(IdentityError::SubjectNotFound),
            status => Err(IdentityError::Provider {
                message: format!("set verified returned {}", status),
            }),
        }
    }

    async fn set_password(
        &self,
        subject_id: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let response = self
            .client
            .put(self.endpoint(&format!("/v1/subjects/{}/password", subject_id)))
            .bearer_auth(&self.api_key)
            .json(&SetPasswordRequest {
                password: new_password,
            })
            .send()
            .await
            .map_err(|e| Self::provider_err("set password", e))?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(IdentityError::SubjectNotFound),
            status => Err(IdentityError::Provider {
                message: format!("set password returned {}", status),
            }),
        }
    }
}
