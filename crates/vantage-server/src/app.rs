use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, routes, state::AppState};

/// Inbound bodies are capped to bound per-request memory; a beacon payload
/// is a few hundred bytes at most.
const MAX_BODY_BYTES: usize = 10 * 1024;

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// The stats endpoints sit behind the shared-secret Basic auth middleware;
/// the event endpoint is open (rate limiting and Origin binding are its
/// gates). CORS is permissive — the beacon is sent cross-origin from
/// tracked sites, and the Origin *binding* check in the validator is the
/// actual authorization boundary.
pub fn build_app(state: Arc<AppState>) -> Router {
    let stats = Router::new()
        .route("/api/stats/summary", get(routes::stats::summary))
        .route("/api/stats/pages", get(routes::stats::pages))
        .route("/api/stats/referrers", get(routes::stats::referrers))
        .route("/api/stats/locations", get(routes::stats::locations))
        .route("/api/stats/sizes", get(routes::stats::sizes))
        .route("/api/stats/browsers", get(routes::stats::browsers))
        .route("/api/stats/systems", get(routes::stats::systems))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/event", post(routes::event::collect))
        .merge(stats)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
