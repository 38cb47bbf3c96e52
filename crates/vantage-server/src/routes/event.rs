use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;

use vantage_core::{
    event::{EventRequest, PageView},
    fingerprint::{fingerprint, today_utc},
    validate::{authorize_event, validate_event},
};

use crate::{error::AppError, state::AppState, ua::parse_user_agent};

/// `POST /api/event` — ingest one page-view beacon.
///
/// Pipeline: rate-limit admission → structural validation → allow-list +
/// Origin binding → visitor fingerprint (day-salted, fails closed if the
/// salt store is unreachable) → GeoIP / UA enrichment (best-effort) →
/// idempotent insert. Responds `202 Accepted`; a same-day duplicate from
/// the same visitor is absorbed by the storage layer and still answers 202,
/// so client retries are safe.
#[tracing::instrument(skip(state, headers, body))]
pub async fn collect(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = extract_client_ip(&headers);

    // Admission first — a denied source pays for nothing further.
    if !state.limiter.admit(&client_ip) {
        return Err(AppError::RateLimited);
    }

    let event: EventRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("invalid JSON body".to_string()))?;

    validate_event(&event)?;

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    authorize_event(&event, &state.config.allowed_domains, origin)?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Fail closed: no salt, no fingerprint, no stored view.
    let salt = state.db.get_or_create_salt(&today_utc()).await?;
    let visitor_hash = fingerprint(&salt, &event.domain, &client_ip, &user_agent);

    let country_code = state.geo.country(&client_ip);
    let (browser, os) = parse_user_agent(&user_agent);

    let pv = PageView {
        domain: event.domain,
        path: event.path,
        referrer: event.referrer,
        screen_size: event.screen_size,
        country_code,
        browser,
        os,
        visitor_hash,
        created_at: Utc::now(),
    };

    state.db.insert_page_view(&pv).await?;

    Ok((StatusCode::ACCEPTED, Json(json!({ "ok": true }))))
}

/// First entry of `X-Forwarded-For`, falling back to `"unknown"`.
///
/// The fallback keeps direct (unproxied) test traffic working; behind the
/// expected reverse proxy the header is always present.
fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
