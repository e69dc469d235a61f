use crate::credential::ServiceCredential;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;

/// Per-user document store. One JSON value per identity; writes replace the
/// stored value wholesale.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch(&self, uid: &str) -> Result<Option<Value>, AppError>;
    async fn replace(&self, uid: &str, document: Value) -> Result<(), AppError>;
}

pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
    credential: Arc<ServiceCredential>,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>, credential: Arc<ServiceCredential>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            credential,
        }
    }

    // Documents are addressed only by the verified caller's uid.
    fn document_url(&self, uid: &str) -> String {
        format!(
            "{}/v1/projects/{}/users/{}",
            self.base_url, self.credential.project_id, uid
        )
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn fetch(&self, uid: &str) -> Result<Option<Value>, AppError> {
        let url = self.document_url(uid);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.credential.private_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                AppError::StoreRead(anyhow::anyhow!("document store request failed: {}", e))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::StoreRead(anyhow::anyhow!(
                "document store returned {}",
                response.status()
            )));
        }

        let document = response.json::<Value>().await.map_err(|e| {
            AppError::StoreRead(anyhow::anyhow!(
                "document store returned an unreadable body: {}",
                e
            ))
        })?;

        Ok(Some(document))
    }

    async fn replace(&self, uid: &str, document: Value) -> Result<(), AppError> {
        let url = self.document_url(uid);

        let response = self
            .client
            .put(&url)
            .bearer_auth(self.credential.private_key.expose_secret())
            .json(&document)
            .send()
            .await
            .map_err(|e| {
                AppError::StoreWrite(anyhow::anyhow!("document store request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::StoreWrite(anyhow::anyhow!(
                "document store returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
