// src/refresh.rs
use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use crate::api::AppState;
use crate::config::{DashboardConfig, ALLOWED_REFRESH_INTERVALS};
use crate::fetch;

#[derive(Clone, Copy, Debug)]
pub struct AutoRefreshCfg {
    pub interval_secs: u64,
}

impl AutoRefreshCfg {
    pub fn from_config(cfg: &DashboardConfig) -> Option<Self> {
        if !cfg.auto_refresh {
            return None;
        }
        // Config sanitizing already clamps to the catalog; guard anyway.
        let interval_secs = if ALLOWED_REFRESH_INTERVALS.contains(&cfg.refresh_interval_secs) {
            cfg.refresh_interval_secs
        } else {
            60
        };
        Some(Self { interval_secs })
    }
}

/// Spawn the auto-refresh ticker: each tick invalidates the cache and
/// refetches so the next render sees fresh data. Ticks never overlap; the
/// next one only starts after the previous fetch fully completed.
pub fn spawn_auto_refresh(cfg: AutoRefreshCfg, state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(cfg.interval_secs));
        // The first tick fires immediately; skip it so startup isn't a double fetch.
        ticker.tick().await;
        loop {
            ticker.tick().await;

            state.cache.invalidate();
            let (items, dropped) = fetch::run_once(&state.providers).await;
            let kept = items.len();
            state.cache.put(items);

            counter!("auto_refresh_runs_total").increment(1);
            gauge!("fetch_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

            tracing::info!(
                target: "refresh",
                kept = kept,
                dropped = dropped,
                interval_secs = cfg.interval_secs,
                "auto-refresh tick"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_auto_refresh_yields_no_cfg() {
        let cfg = DashboardConfig::default();
        assert!(AutoRefreshCfg::from_config(&cfg).is_none());
    }

    #[test]
    fn enabled_auto_refresh_uses_configured_interval() {
        let cfg = DashboardConfig {
            auto_refresh: true,
            refresh_interval_secs: 120,
            ..DashboardConfig::default()
        };
        let rc = AutoRefreshCfg::from_config(&cfg).unwrap();
        assert_eq!(rc.interval_secs, 120);
    }
}
