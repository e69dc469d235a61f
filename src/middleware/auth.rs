use crate::error::AppError;
use crate::services::VerifiedIdentity;
use crate::startup::AppState;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

/// Rejects every request with a configuration error while the process runs
/// without a parsed service credential. Applied as a route layer on the data
/// endpoint so it fires before method dispatch and before any auth work.
pub async fn require_service_credential(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.require_clients()?;
    Ok(next.run(request).await)
}

/// Extractor establishing the caller's identity.
///
/// Requires an `Authorization: Bearer <token>` header and exchanges the token
/// with the identity service. Runs only for matched GET/POST handlers, so
/// unsupported methods still get their 405 without touching the verifier.
///
/// Verification failures of any kind collapse into a single 403; the actual
/// reason is logged for operators and never reaches the caller.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub VerifiedIdentity);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let clients = state.require_clients()?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!(
                    "missing or malformed Authorization header"
                ))
            })?;

        let identity = match clients.identity.verify(token).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!(error = %e, "Error verifying auth token");
                metrics::counter!("auth_failures_total").increment(1);
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "token rejected by identity service"
                )));
            }
        };

        tracing::Span::current().record("uid", identity.uid.as_str());

        Ok(AuthenticatedUser(identity))
    }
}
