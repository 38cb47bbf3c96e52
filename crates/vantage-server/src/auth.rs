use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;

use crate::{error::AppError, state::AppState};

/// Shared-secret HTTP Basic auth for the stats endpoints.
///
/// An empty configured password disables the gate entirely. The username is
/// ignored; only the password part of the credentials is compared.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.auth_enabled() {
        return next.run(request).await;
    }

    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(basic_password);

    match supplied {
        Some(password) if password == state.config.password => next.run(request).await,
        _ => AppError::Unauthorized.into_response(),
    }
}

/// Extract the password from a `Basic base64(user:pass)` header value.
fn basic_password(header_value: &str) -> Option<String> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (_user, password) = credentials.split_once(':')?;
    Some(password.to_string())
}
