use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::analyze::{AnalysisInput, RiskScorer, ScorerConfig};
use crate::config::{FeedSettings, StoreConfig};
use crate::detect::scan_pending;
use crate::feed::fetch_analyzed_feeds;
use crate::ingest::providers::HttpFeedFetcher;
use crate::ingest::run_sweep;
use crate::ingest::types::FeedFetcher;
use crate::store::{ContentStore, InMemoryStore, NewRssSource, SourceCategory, SupabaseStore};

const DEFAULT_CREDIBILITY: f32 = 0.75;

/// Dependencies shared by all handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub fetcher: Arc<dyn FeedFetcher>,
    pub scorer: Arc<RiskScorer>,
    pub feeds: Arc<FeedSettings>,
    pub batch_size: usize,
}

impl AppState {
    /// Wire everything from the environment. Without store credentials the
    /// in-memory store is used, seeded with the configured feed list.
    pub fn from_env() -> anyhow::Result<Self> {
        let scorer = RiskScorer::new(ScorerConfig::from_env());
        let feeds = FeedSettings::from_env()?;
        let store_cfg = StoreConfig::from_env();

        // one connection pool for feed downloads and store calls
        let http = reqwest::Client::builder()
            .user_agent(concat!("misinfo-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;

        let store: Arc<dyn ContentStore> = match store_cfg.remote() {
            Some((url, key)) => {
                tracing::info!(url, "using hosted content store");
                Arc::new(SupabaseStore::with_client(http.clone(), url, key))
            }
            None => {
                tracing::warn!("SUPABASE_URL/key not set, using in-memory content store");
                Arc::new(InMemoryStore::with_sources(
                    feeds.sources.iter().map(|s| (s.name.clone(), s.url.clone())),
                ))
            }
        };

        Ok(Self {
            store,
            fetcher: Arc::new(HttpFeedFetcher::with_client(http)),
            scorer: Arc::new(scorer),
            feeds: Arc::new(feeds),
            batch_size: store_cfg.batch_size,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/analysis/manual", post(analyze_manual))
        .route("/api/analysis/feed", get(analyzed_feed))
        .route("/api/rss/fetch", post(rss_fetch))
        .route("/api/sources/add", post(add_source))
        .route("/api/agents/detect", post(detect))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Handler error rendered as `{"error": "..."}`.
pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": format!("{e:#}") })),
                )
                    .into_response()
            }
        }
    }
}

async fn analyze_manual(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let content = body
        .get("content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("content is required".into()))?;

    let result = state.scorer.analyze(&AnalysisInput::content(content));
    Ok(Json(json!({ "result": result })))
}

async fn analyzed_feed(State(state): State<AppState>) -> Json<Value> {
    let items = fetch_analyzed_feeds(state.fetcher.as_ref(), &state.scorer, &state.feeds).await;
    Json(json!({ "items": items }))
}

async fn rss_fetch(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    run_sweep(state.store.as_ref(), state.fetcher.as_ref()).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct AddSourceReq {
    name: Option<String>,
    url: Option<String>,
    category: Option<String>,
    credibility: Option<f32>,
}

async fn add_source(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let req: AddSourceReq = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid body: {e}")))?;

    let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let (Some(name), Some(url), Some(category)) = (
        non_blank(req.name),
        non_blank(req.url),
        non_blank(req.category),
    ) else {
        return Err(ApiError::BadRequest("name, url, category required".into()));
    };

    let category: SourceCategory = serde_json::from_value(Value::String(category.clone()))
        .map_err(|_| ApiError::BadRequest(format!("unknown category '{category}'")))?;
    let credibility = req.credibility.unwrap_or(DEFAULT_CREDIBILITY);
    if !(0.0..=1.0).contains(&credibility) {
        return Err(ApiError::BadRequest(
            "credibility must be within [0, 1]".into(),
        ));
    }

    let row = state
        .store
        .add_source(NewRssSource {
            name,
            url,
            category,
            credibility_score: credibility,
        })
        .await?;
    tracing::info!(id = %row.id, name = %row.name, "feed source added");
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize, Default)]
struct DetectReq {
    batch_size: Option<usize>,
}

async fn detect(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let req: DetectReq = if body.is_empty() {
        DetectReq::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid body: {e}")))?
    };
    let batch = req.batch_size.unwrap_or(state.batch_size);
    let report = scan_pending(state.store.as_ref(), &state.scorer, batch).await?;
    Ok(Json(json!({ "scanned": report.scanned, "suspected": report.suspected })))
}
