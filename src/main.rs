use dotenvy::dotenv;
use std::sync::Arc;
use userdata_service::config::Settings;
use userdata_service::credential::ServiceCredential;
use userdata_service::observability::init_tracing;
use userdata_service::services::init_metrics;
use userdata_service::startup::{AppState, Application, Clients};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Metrics recorder must be installed before any counter is recorded.
    init_metrics();

    let otlp_endpoint =
        std::env::var("OTLP_ENDPOINT").unwrap_or_else(|_| "http://tempo:4317".to_string());
    init_tracing("userdata-service", "info", &otlp_endpoint);

    let settings = Settings::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    // A bad credential degrades the service instead of aborting startup:
    // the process comes up, but every data request is answered with 500.
    let clients = match ServiceCredential::from_env() {
        Ok(credential) => {
            let credential = Arc::new(credential);
            tracing::info!(
                project_id = %credential.project_id,
                client_email = %credential.client_email,
                "Service account credential loaded"
            );
            Some(Clients::http(&settings, credential))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to parse service account credential; all data requests will be rejected"
            );
            None
        }
    };

    let state = AppState { clients };

    let app = Application::build(&settings, state).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    tracing::info!(port = app.port(), "Starting userdata-service");
    app.run_until_stopped().await?;

    Ok(())
}
