//! Radio timeline service — binary entrypoint.
//! Boots the Axum HTTP server, the periodic provider refresh, and the
//! Prometheus recorder.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use radiogrid::api::{self, AppState};
use radiogrid::config::AppConfig;
use radiogrid::ingest::scheduler::{self, RefreshCfg};
use radiogrid::metrics::Metrics;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("radiogrid=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env();
    let metrics = Metrics::init(cfg.refresh_secs);

    let snapshot = scheduler::new_snapshot();
    let providers = radiogrid::ingest::providers::default_providers();
    scheduler::spawn_refresh(
        providers,
        snapshot.clone(),
        RefreshCfg {
            interval_secs: cfg.refresh_secs,
        },
    );

    let state = AppState {
        snapshot,
        horizon_ms: cfg.horizon_ms(),
    };
    let app = api::router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(cfg.addr).await?;
    tracing::info!(addr = %cfg.addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
