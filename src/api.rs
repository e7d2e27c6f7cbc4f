use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use metrics::counter;
use tower_http::cors::CorsLayer;

use crate::cache::FeedCache;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::export;
use crate::fetch::{self, types::NewsProvider};
use crate::model::{NewsItem, SortKey};
use crate::pipeline::{self, DateRange, FilterParams, SourceSelection};

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<FeedCache>,
    pub providers: Arc<Vec<Box<dyn NewsProvider>>>,
}

impl AppState {
    /// Wire the cache and HTTP feed providers from config.
    pub fn from_config(cfg: &DashboardConfig) -> Self {
        Self {
            cache: Arc::new(FeedCache::new(std::time::Duration::from_secs(
                cfg.cache_ttl_secs,
            ))),
            providers: Arc::new(fetch::providers::from_feed_configs(&cfg.feeds)),
        }
    }

    /// State with explicit providers (fixture providers in tests).
    pub fn with_providers(
        providers: Vec<Box<dyn NewsProvider>>,
        ttl: std::time::Duration,
    ) -> Self {
        Self {
            cache: Arc::new(FeedCache::new(ttl)),
            providers: Arc::new(providers),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(get_news))
        .route("/news/summary", get(get_summary))
        .route("/news/export", get(export_csv))
        .route("/news/refresh", post(refresh))
        .route("/news/status", get(status))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Query parameters shared by the news endpoints. All optional with the
/// dashboard defaults; `sources` is comma-separated with `All` as sentinel.
#[derive(Debug, Default, serde::Deserialize)]
pub struct NewsQuery {
    #[serde(default)]
    keyword: String,
    sort: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    sources: Option<String>,
    show_desc: Option<bool>,
}

impl NewsQuery {
    /// Resolve into pipeline params. `sources_default_all` distinguishes
    /// the strict display endpoint (explicit choice required) from export
    /// (available before any selection is made).
    fn into_params(self, sources_default_all: bool) -> Result<FilterParams, DashboardError> {
        let range = match (self.from, self.to) {
            (Some(a), Some(b)) => Some(DateRange::new(a, b)?),
            // A single supplied date counts for both bounds.
            (Some(a), None) => Some(DateRange::single(a)),
            (None, Some(b)) => Some(DateRange::single(b)),
            (None, None) => None,
        };

        let sources = match self.sources.as_deref() {
            Some(list) => {
                SourceSelection::from_list(list.split(',').map(str::trim).map(str::to_string))?
            }
            None if sources_default_all => SourceSelection::All,
            None => return Err(DashboardError::EmptySelection),
        };

        let sort = self
            .sort
            .as_deref()
            .and_then(SortKey::parse)
            .unwrap_or_default();

        Ok(FilterParams {
            keyword: self.keyword,
            range,
            sources,
            sort,
        })
    }
}

#[derive(serde::Serialize)]
struct NewsResponse {
    items: Vec<NewsItem>,
    summary: pipeline::FeedSummary,
    /// Distinct source names of the whole table, for the filter option list.
    sources: Vec<String>,
}

async fn get_news(
    State(state): State<AppState>,
    Query(q): Query<NewsQuery>,
) -> Result<Json<NewsResponse>, DashboardError> {
    let show_desc = q.show_desc.unwrap_or(true);
    let params = q.into_params(false)?;
    let table = load_table(&state).await?;

    let sources = pipeline::distinct_sources(&table);
    let view = pipeline::run(&table, &params);

    let mut items = view.items;
    if !show_desc {
        for it in &mut items {
            it.description.clear();
        }
    }

    Ok(Json(NewsResponse {
        items,
        summary: view.summary,
        sources,
    }))
}

async fn get_summary(
    State(state): State<AppState>,
    Query(q): Query<NewsQuery>,
) -> Result<Json<pipeline::FeedSummary>, DashboardError> {
    let table = load_table(&state).await?;
    let filtered = pipeline::filter_by_keyword(&table, &q.keyword);
    Ok(Json(pipeline::summarize(&filtered)))
}

async fn export_csv(
    State(state): State<AppState>,
    Query(q): Query<NewsQuery>,
) -> Result<Response, DashboardError> {
    // Export is offered before any source selection, so default to All.
    let params = q.into_params(true)?;
    let table = load_table(&state).await?;
    let view = pipeline::run(&table, &params);
    let csv_text = export::to_csv(&view.items)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::EXPORT_FILE_NAME),
            ),
        ],
        csv_text,
    )
        .into_response())
}

#[derive(serde::Serialize)]
struct RefreshInfo {
    items: usize,
    dropped: usize,
    last_refreshed: Option<chrono::DateTime<chrono::Utc>>,
}

/// Invalidate the cache and refetch immediately, regardless of remaining TTL.
async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshInfo>, DashboardError> {
    state.cache.invalidate();
    let (items, dropped) = fetch::run_once(&state.providers).await;
    let count = items.len();
    state.cache.put(items);
    counter!("feed_manual_refresh_total").increment(1);

    Ok(Json(RefreshInfo {
        items: count,
        dropped,
        last_refreshed: state.cache.last_refreshed(),
    }))
}

#[derive(serde::Serialize)]
struct StatusInfo {
    last_refreshed: Option<chrono::DateTime<chrono::Utc>>,
    ttl_secs: u64,
    cached_items: usize,
}

async fn status(State(state): State<AppState>) -> Json<StatusInfo> {
    Json(StatusInfo {
        last_refreshed: state.cache.last_refreshed(),
        ttl_secs: state.cache.ttl_secs(),
        cached_items: state.cache.len(),
    })
}

/// Return the news table, from cache when fresh, refetching otherwise.
/// An empty table surfaces as `NoData` so "fetch came back empty" is never
/// confused with "no rows matched the filters".
async fn load_table(state: &AppState) -> Result<Vec<NewsItem>, DashboardError> {
    let items = match state.cache.get() {
        Some(items) => {
            counter!("feed_cache_hits_total").increment(1);
            items
        }
        None => {
            counter!("feed_cache_misses_total").increment(1);
            let (items, _dropped) = fetch::run_once(&state.providers).await;
            state.cache.put(items.clone());
            items
        }
    };
    if items.is_empty() {
        return Err(DashboardError::NoData);
    }
    Ok(items)
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            DashboardError::NoData => (StatusCode::SERVICE_UNAVAILABLE, "no_data"),
            DashboardError::EmptySelection => (StatusCode::UNPROCESSABLE_ENTITY, "empty_selection"),
            DashboardError::InvalidDateRange { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_date_range")
            }
            DashboardError::Internal(e) => {
                // Unexpected failures stop here; the session stays alive.
                tracing::error!(error = ?e, "unhandled dashboard error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        let body = serde_json::json!({
            "error": kind,
            "message": self.to_string(),
            "hint": "try refreshing the data",
        });
        (status, Json(body)).into_response()
    }
}
