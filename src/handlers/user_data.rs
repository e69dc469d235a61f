use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// GET /api/data — return the caller's document.
///
/// An identity with no stored document gets `{}` with a 200, not a 404; "no
/// data yet" and "found empty data" are deliberately indistinguishable here.
pub async fn get_user_data(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    metrics::counter!("user_data_requests_total", "method" => "get").increment(1);

    let clients = state.require_clients()?;

    let document = clients.documents.fetch(&identity.uid).await.map_err(|e| {
        tracing::error!(uid = %identity.uid, error = %e, "Error getting document");
        e
    })?;

    Ok(Json(document.unwrap_or_else(|| json!({}))))
}

/// POST /api/data — replace the caller's document with the request body.
pub async fn save_user_data(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(document): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    metrics::counter!("user_data_requests_total", "method" => "post").increment(1);

    let clients = state.require_clients()?;

    clients
        .documents
        .replace(&identity.uid, document)
        .await
        .map_err(|e| {
            tracing::error!(uid = %identity.uid, error = %e, "Error setting document");
            e
        })?;

    tracing::info!(uid = %identity.uid, "User document replaced");

    Ok((StatusCode::OK, "Data saved successfully."))
}
