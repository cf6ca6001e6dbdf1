//! Bearer-token gate for the `/api` routes

use crate::{
    AppState,
    error::{ApiError, Result},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;

/// Reject requests without a configured `Authorization: Bearer` token
///
/// Passes everything through when no tokens are configured.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !state.config.auth_enabled() {
        return Ok(next.run(request).await);
    }

    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        return Err(ApiError::Unauthorized);
    };

    if !state.config.api_tokens.iter().any(|t| t == bearer.token()) {
        warn!("Rejected request to {} with unknown bearer token", request.uri().path());
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
