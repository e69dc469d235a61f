use crate::config::Settings;
use crate::credential::ServiceCredential;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::require_service_credential;
use crate::services::{DocumentStore, HttpDocumentStore, HttpIdentityClient, IdentityVerifier};
use axum::{
    routing::get,
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Upstream service clients, built once and shared across requests.
#[derive(Clone)]
pub struct Clients {
    pub identity: Arc<dyn IdentityVerifier>,
    pub documents: Arc<dyn DocumentStore>,
}

impl Clients {
    pub fn http(settings: &Settings, credential: Arc<ServiceCredential>) -> Self {
        Self {
            identity: Arc::new(HttpIdentityClient::new(
                &settings.identity_service_url,
                credential.clone(),
            )),
            documents: Arc::new(HttpDocumentStore::new(
                &settings.document_store_url,
                credential,
            )),
        }
    }
}

/// `clients` is `None` when the service credential failed to parse at startup;
/// the process then serves only configuration errors on the data endpoint.
#[derive(Clone)]
pub struct AppState {
    pub clients: Option<Clients>,
}

impl AppState {
    pub fn require_clients(&self) -> Result<&Clients, AppError> {
        self.clients.as_ref().ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("service account credential was not loaded"))
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/data",
            get(handlers::get_user_data).post(handlers::save_user_data),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_service_credential,
        ))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(settings: &Settings, state: AppState) -> Result<Self, AppError> {
        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
