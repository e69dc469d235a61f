use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the identity verification service.
    #[serde(default = "default_identity_service_url")]
    pub identity_service_url: String,
    /// Base URL of the per-user document store.
    #[serde(default = "default_document_store_url")]
    pub document_store_url: String,
}

fn default_port() -> u16 {
    8080
}

fn default_identity_service_url() -> String {
    "http://localhost:9096".to_string()
}

fn default_document_store_url() -> String {
    "http://localhost:9098".to_string()
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
