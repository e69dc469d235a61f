use crate::credential::ServiceCredential;
use crate::error::AppError;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;

/// Identity established by the verification service. Lives for one request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedIdentity {
    pub uid: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError>;
}

/// Client for the external identity verification service.
///
/// Exchanges a caller-supplied bearer token for the verified identity behind
/// it. Requests are authenticated with the process service credential.
pub struct HttpIdentityClient {
    client: reqwest::Client,
    base_url: String,
    credential: Arc<ServiceCredential>,
}

impl HttpIdentityClient {
    pub fn new(base_url: impl Into<String>, credential: Arc<ServiceCredential>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            credential,
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityClient {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        let url = format!("{}/v1/tokens:verify", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.credential.private_key.expose_secret())
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| {
                AppError::Forbidden(anyhow::anyhow!(
                    "identity service request to {} failed: {}",
                    url,
                    e
                ))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "identity service rejected token: {}",
                response.status()
            )));
        }

        let identity: VerifiedIdentity = response.json().await.map_err(|e| {
            AppError::Forbidden(anyhow::anyhow!(
                "identity service returned an unreadable body: {}",
                e
            ))
        })?;

        Ok(identity)
    }
}
