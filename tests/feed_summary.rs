// tests/feed_summary.rs
//
// Live feed summary over canned feeds: per-source and overall limits, and
// isolation of failing feeds.

use misinfo_monitor::analyze::{RiskScorer, ScorerConfig, Verdict};
use misinfo_monitor::config::{FeedSettings, FeedSource};
use misinfo_monitor::feed::fetch_analyzed_feeds;
use misinfo_monitor::ingest::providers::FixtureFetcher;

const DESK: &str = "https://desk.example/feed.xml";
const FACTS: &str = "https://factcheck.example/atom.xml";
const BROKEN: &str = "https://broken.example/rss";

const UNTITLED_RSS: &str = r#"<rss version="2.0"><channel>
  <item><link>https://anon.example/1</link><description>Shocking leaked clip</description></item>
</channel></rss>"#;

fn src(name: &str, url: &str) -> FeedSource {
    FeedSource {
        name: name.into(),
        url: url.into(),
    }
}

fn fetcher() -> FixtureFetcher {
    FixtureFetcher::new()
        .with(DESK, include_str!("fixtures/election_rss.xml"))
        .with(FACTS, include_str!("fixtures/fact_check_atom.xml"))
        .with(BROKEN, include_str!("fixtures/broken.xml"))
}

fn scorer() -> RiskScorer {
    RiskScorer::deterministic(ScorerConfig::default())
}

#[tokio::test]
async fn takes_first_entries_of_each_source_in_order() {
    let settings = FeedSettings {
        sources: vec![src("Election Desk", DESK), src("Fact Check", FACTS)],
        items_per_source: 2,
        result_limit: 12,
    };
    let items = fetch_analyzed_feeds(&fetcher(), &scorer(), &settings).await;

    let got: Vec<(&str, &str)> = items
        .iter()
        .map(|i| (i.source.as_str(), i.title.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Election Desk", "Deepfake video shocking claims of EVM rigging"),
            ("Election Desk", "Election Commission official press release on turnout"),
            ("Fact Check", "Fact check: AI-generated speech attributed to candidate"),
            ("Fact Check", "Morphed image of rally crowd"),
        ]
    );
    assert_eq!(items[0].verdict, Verdict::DeepfakeSuspected);
    assert_eq!(items[1].verdict, Verdict::LikelyReal);
    assert_eq!(
        items[0].link.as_deref(),
        Some("https://desk.example/news/deepfake-evm")
    );
    assert!(items.iter().all(|i| i.reasons.len() == 1));
}

#[tokio::test]
async fn overall_limit_caps_results() {
    let settings = FeedSettings {
        sources: vec![src("Election Desk", DESK), src("Fact Check", FACTS)],
        items_per_source: 3,
        result_limit: 4,
    };
    let items = fetch_analyzed_feeds(&fetcher(), &scorer(), &settings).await;
    assert_eq!(items.len(), 4);
    assert_eq!(items[3].source, "Fact Check");
}

#[tokio::test]
async fn failing_feeds_are_skipped() {
    let settings = FeedSettings {
        sources: vec![
            src("Broken", BROKEN),
            src("Unreachable", "https://nowhere.example/rss"),
            src("Fact Check", FACTS),
        ],
        items_per_source: 2,
        result_limit: 12,
    };
    let items = fetch_analyzed_feeds(&fetcher(), &scorer(), &settings).await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.source == "Fact Check"));
}

#[tokio::test]
async fn all_feeds_failing_yields_empty_list() {
    let settings = FeedSettings {
        sources: vec![src("Broken", BROKEN)],
        items_per_source: 2,
        result_limit: 12,
    };
    assert!(fetch_analyzed_feeds(&fetcher(), &scorer(), &settings)
        .await
        .is_empty());
}

#[tokio::test]
async fn missing_title_gets_placeholder() {
    let fetcher = FixtureFetcher::new().with("https://anon.example/rss", UNTITLED_RSS);
    let settings = FeedSettings {
        sources: vec![src("Anon", "https://anon.example/rss")],
        items_per_source: 2,
        result_limit: 12,
    };
    let items = fetch_analyzed_feeds(&fetcher, &scorer(), &settings).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Untitled item");
    // scored on the description alone: 0.35 + 2 * 0.10 + 0.08
    assert!((items[0].score - 0.63).abs() < 1e-6, "score = {}", items[0].score);
}

#[tokio::test]
async fn items_serialize_camel_case() {
    let settings = FeedSettings {
        sources: vec![src("Election Desk", DESK)],
        items_per_source: 1,
        result_limit: 12,
    };
    let items = fetch_analyzed_feeds(&fetcher(), &scorer(), &settings).await;
    let v = serde_json::to_value(&items[0]).unwrap();
    assert_eq!(v["verdict"], "deepfake_suspected");
    assert!(v.get("publishedAt").is_some());
    assert!(v.get("published_at").is_none());
}
