//! AI News Dashboard — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ai_news_dashboard::config::DashboardConfig;
use ai_news_dashboard::telemetry::Metrics;
use ai_news_dashboard::refresh::{spawn_auto_refresh, AutoRefreshCfg};
use ai_news_dashboard::{api, AppState};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ai_news_dashboard=info,warn"));

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

    let cfg = DashboardConfig::load_default()?;
    let metrics = Metrics::init(cfg.cache_ttl_secs, cfg.refresh_interval_secs);

    let state = AppState::from_config(&cfg);

    // Optional background refetch; the pipeline itself stays synchronous.
    if let Some(rc) = AutoRefreshCfg::from_config(&cfg) {
        spawn_auto_refresh(rc, state.clone());
        tracing::info!(interval_secs = rc.interval_secs, "auto-refresh enabled");
    }

    let app = api::router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, feeds = cfg.feeds.len(), "dashboard listening");
    axum::serve(listener, app).await?;
    Ok(())
}
