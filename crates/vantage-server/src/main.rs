use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use vantage_server::geo::CountryResolver;
use vantage_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vantage=info".parse()?),
        )
        .json()
        .init();

    let cfg = vantage_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Ensure the data directory exists before opening DuckDB.
    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/vantage.db", cfg.data_dir);
    let db = vantage_duckdb::DuckDbBackend::open(&db_path)?;

    // Logs and degrades on its own if the database file is absent.
    let geo = CountryResolver::new(&cfg.geoip_path);

    if cfg.allowed_domains.is_empty() {
        info!("No domain allow-list configured — accepting events for any domain");
    } else {
        info!(domains = ?cfg.allowed_domains, "Domain allow-list active");
    }
    if !cfg.auth_enabled() {
        info!("Stats auth disabled (VANTAGE_PASSWORD empty) — stats endpoints open");
    }

    let addr = cfg.addr.clone();
    let state = Arc::new(AppState::new(db, cfg, geo));

    // Background sweeps: limiter eviction and salt retention. Both run for
    // the life of the process, decoupled from the request path.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            state.run_limiter_sweep_loop().await;
        });
    }
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            state.run_salt_retention_loop().await;
        });
    }

    let app = vantage_server::app::build_app(Arc::clone(&state));

    info!(%addr, "vantage listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
