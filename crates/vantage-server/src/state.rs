use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info};

use vantage_core::config::Config;
use vantage_duckdb::DuckDbBackend;

use crate::geo::CountryResolver;
use crate::limiter::RateLimiter;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The DuckDB connection (salt store + page views) and the limiter table are
/// the only cross-request mutable state; each is internally synchronized and
/// every mutation is a single atomic step, so an aborted request never
/// leaves either half-updated.
pub struct AppState {
    pub db: Arc<DuckDbBackend>,
    pub config: Arc<Config>,
    pub limiter: RateLimiter,
    pub geo: CountryResolver,
}

impl AppState {
    pub fn new(db: DuckDbBackend, config: Config, geo: CountryResolver) -> Self {
        let limiter = RateLimiter::new(
            config.rate_per_sec,
            config.rate_burst,
            Duration::from_secs(config.limiter_idle_secs),
        );
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            limiter,
            geo,
        }
    }

    /// Background loop: evict idle rate-limiter buckets on a fixed interval.
    ///
    /// Spawned from `main.rs`, runs for the life of the process. `Delay`
    /// tick behaviour means a slow sweep shifts the schedule rather than
    /// piling up overlapping ticks; each tick runs to completion.
    pub async fn run_limiter_sweep_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.limiter_sweep_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let evicted = self.limiter.sweep();
            if evicted > 0 {
                debug!(evicted, remaining = self.limiter.len(), "Rate buckets evicted");
            }
        }
    }

    /// Background loop: delete daily salts past the retention window.
    ///
    /// A failed sweep is logged and retried on the next tick; it never
    /// touches the request path.
    pub async fn run_salt_retention_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.salt_sweep_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let cutoff = (Utc::now().date_naive()
                - chrono::Duration::days(self.config.salt_retention_days))
            .format("%Y-%m-%d")
            .to_string();
            match self.db.delete_salts_before(&cutoff).await {
                Ok(0) => {}
                Ok(deleted) => info!(deleted, %cutoff, "Expired daily salts deleted"),
                Err(e) => error!(error = %e, "Salt retention sweep failed"),
            }
        }
    }
}
