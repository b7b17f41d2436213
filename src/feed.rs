//! Live feed summary: the newest few entries of each configured feed, scored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyze::{AnalysisInput, RiskScorer, Verdict};
use crate::config::FeedSettings;
use crate::ingest::types::FeedFetcher;

const UNTITLED: &str = "Untitled item";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemAnalysis {
    pub source: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub verdict: Verdict,
    pub score: f32,
    pub reasons: Vec<String>,
}

/// Fetch every configured feed in order and score its first `items_per_source`
/// entries on title + description. Failing feeds are logged and skipped. At most
/// `result_limit` items are returned.
pub async fn fetch_analyzed_feeds(
    fetcher: &dyn FeedFetcher,
    scorer: &RiskScorer,
    settings: &FeedSettings,
) -> Vec<FeedItemAnalysis> {
    let mut results = Vec::new();

    for source in &settings.sources {
        if results.len() >= settings.result_limit {
            break;
        }
        let entries = match fetcher.fetch_feed(&source.url).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, source = %source.name, "failed to parse feed");
                continue;
            }
        };

        for entry in entries.into_iter().take(settings.items_per_source) {
            let analysis = scorer.analyze(&AnalysisInput {
                title: entry.title.clone(),
                description: entry.description.clone().or_else(|| entry.content.clone()),
                content: None,
            });
            results.push(FeedItemAnalysis {
                source: source.name.clone(),
                title: entry.title.unwrap_or_else(|| UNTITLED.to_string()),
                link: entry.link,
                published_at: entry.published_at,
                verdict: analysis.verdict,
                score: analysis.score,
                reasons: analysis.reasons,
            });
        }
    }

    results.truncate(settings.result_limit);
    results
}
