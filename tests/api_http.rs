// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot, with the
// in-memory store, canned feeds and a jitter-free scorer.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use misinfo_monitor::analyze::{RiskScorer, ScorerConfig};
use misinfo_monitor::api::{self, AppState};
use misinfo_monitor::config::{FeedSettings, FeedSource};
use misinfo_monitor::ingest::providers::FixtureFetcher;
use misinfo_monitor::store::{InMemoryStore, ScanStatus, SourceCategory};

const BODY_LIMIT: usize = 1024 * 1024;
const DESK: &str = "https://desk.example/feed.xml";

fn state_with(store: Arc<InMemoryStore>) -> AppState {
    let fetcher = FixtureFetcher::new().with(DESK, include_str!("fixtures/election_rss.xml"));
    AppState {
        store,
        fetcher: Arc::new(fetcher),
        scorer: Arc::new(RiskScorer::deterministic(ScorerConfig::default())),
        feeds: Arc::new(FeedSettings {
            sources: vec![FeedSource {
                name: "Election Desk".into(),
                url: DESK.into(),
            }],
            items_per_source: 2,
            result_limit: 12,
        }),
        batch_size: 50,
    }
}

fn test_app() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::with_sources([("Election Desk", DESK)]));
    (api::router(state_with(store.clone())), store)
}

fn post_json(uri: &str, payload: &Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Json) {
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _) = test_app();
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");
    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8_lossy(&bytes).trim(), "OK");
}

#[tokio::test]
async fn manual_analysis_returns_result() {
    let (app, _) = test_app();
    let (status, v) = send(
        &app,
        post_json(
            "/api/analysis/manual",
            &json!({ "content": "Deepfake video shocking claims of EVM rigging" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let r = &v["result"];
    assert_eq!(r["verdict"], "deepfake_suspected");
    assert!((r["score"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    assert_eq!(
        r["reasons"][0],
        "Multiple deepfake/hype indicators detected"
    );
    let terms = r["highlightedTerms"].as_array().expect("highlightedTerms");
    assert!(terms.iter().any(|t| t == "deepfake"));
}

#[tokio::test]
async fn manual_analysis_rejects_missing_content() {
    let (app, _) = test_app();
    for body in [json!({}), json!({ "content": "" }), json!({ "content": 42 })] {
        let (status, v) = send(&app, post_json("/api/analysis/manual", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(v["error"], "content is required");
    }
}

#[tokio::test]
async fn manual_analysis_whitespace_is_empty_text() {
    let (app, _) = test_app();
    let (status, v) = send(
        &app,
        post_json("/api/analysis/manual", &json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["result"]["verdict"], "likely_real");
    assert_eq!(v["result"]["reasons"][0], "No content provided");
}

#[tokio::test]
async fn feed_analysis_lists_scored_items() {
    let (app, _) = test_app();
    let req = Request::builder()
        .uri("/api/analysis/feed")
        .body(Body::empty())
        .unwrap();
    let (status, v) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let items = v["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["source"], "Election Desk");
    assert_eq!(items[0]["verdict"], "deepfake_suspected");
    assert_eq!(items[1]["verdict"], "likely_real");
}

#[tokio::test]
async fn rss_fetch_then_detect() {
    let (app, store) = test_app();

    let (status, v) = send(&app, post_json("/api/rss/fetch", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({ "success": true }));
    assert_eq!(store.items().len(), 2);

    let req = Request::builder()
        .method("POST")
        .uri("/api/agents/detect")
        .body(Body::empty())
        .unwrap();
    let (status, v) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({ "scanned": 2, "suspected": 1 }));
    assert!(store
        .items()
        .iter()
        .all(|i| i.scan_status == ScanStatus::Completed));
}

#[tokio::test]
async fn detect_honours_batch_size() {
    let (app, store) = test_app();
    send(&app, post_json("/api/rss/fetch", &json!({}))).await;

    let (status, v) = send(
        &app,
        post_json("/api/agents/detect", &json!({ "batch_size": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["scanned"], 1);
    let pending = store
        .items()
        .iter()
        .filter(|i| i.scan_status == ScanStatus::Pending)
        .count();
    assert_eq!(pending, 1);
}

#[tokio::test]
async fn add_source_stores_active_source() {
    let (app, store) = test_app();
    let (status, v) = send(
        &app,
        post_json(
            "/api/sources/add",
            &json!({
                "name": " Fact Check Weekly ",
                "url": "https://factcheck.example/atom.xml",
                "category": "fact_checkers",
                "credibility": 0.9
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({ "success": true }));

    let added = store
        .sources()
        .into_iter()
        .find(|s| s.url == "https://factcheck.example/atom.xml")
        .expect("source stored");
    assert_eq!(added.name, "Fact Check Weekly");
    assert_eq!(added.category, SourceCategory::FactCheckers);
    assert!(added.is_active);
    assert!((added.credibility_score - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn add_source_defaults_credibility() {
    let (app, store) = test_app();
    let (status, _) = send(
        &app,
        post_json(
            "/api/sources/add",
            &json!({ "name": "Wire", "url": "https://wire.example/rss", "category": "mainstream_media" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let added = store
        .sources()
        .into_iter()
        .find(|s| s.name == "Wire")
        .unwrap();
    assert!((added.credibility_score - 0.75).abs() < 1e-6);
}

#[tokio::test]
async fn add_source_validates_input() {
    let (app, store) = test_app();
    let bad = [
        json!({ "url": "https://x.example/rss", "category": "election_news" }),
        json!({ "name": "X", "url": "  ", "category": "election_news" }),
        json!({ "name": "X", "url": "https://x.example/rss", "category": "tabloids" }),
        json!({ "name": "X", "url": "https://x.example/rss", "category": "election_news", "credibility": 1.5 }),
    ];
    for body in bad {
        let (status, v) = send(&app, post_json("/api/sources/add", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert!(v["error"].is_string());
    }
    assert_eq!(store.sources().len(), 1);
}
