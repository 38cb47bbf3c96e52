use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use vantage_core::stats::Period;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub domain: Option<String>,
    pub period: Option<String>,
}

/// `domain` is required; `period` is `today|7d|30d|12m`, anything else
/// (including absence) means the 30-day default.
fn parse_params(query: &StatsQuery) -> Result<(String, i64), AppError> {
    let domain = query
        .domain
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::BadRequest("domain is required".to_string()))?;
    let days = Period::parse(query.period.as_deref().unwrap_or_default()).days();
    Ok((domain.to_string(), days))
}

/// `GET /api/stats/summary` — totals plus a per-day series.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, days) = parse_params(&query)?;
    Ok(Json(state.db.summary(&domain, days).await?))
}

/// `GET /api/stats/pages` — top pages by views.
pub async fn pages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, days) = parse_params(&query)?;
    Ok(Json(state.db.top_pages(&domain, days).await?))
}

/// `GET /api/stats/referrers` — top referrers, empty referrer excluded.
pub async fn referrers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, days) = parse_params(&query)?;
    Ok(Json(state.db.top_referrers(&domain, days).await?))
}

/// `GET /api/stats/locations` — top countries.
pub async fn locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, days) = parse_params(&query)?;
    Ok(Json(state.db.top_locations(&domain, days).await?))
}

/// `GET /api/stats/sizes` — top screen sizes.
pub async fn sizes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, days) = parse_params(&query)?;
    Ok(Json(state.db.top_screen_sizes(&domain, days).await?))
}

/// `GET /api/stats/browsers` — top browsers.
pub async fn browsers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, days) = parse_params(&query)?;
    Ok(Json(state.db.top_browsers(&domain, days).await?))
}

/// `GET /api/stats/systems` — top operating systems.
pub async fn systems(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, days) = parse_params(&query)?;
    Ok(Json(state.db.top_systems(&domain, days).await?))
}
