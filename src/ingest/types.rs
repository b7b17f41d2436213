// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One parsed feed entry, text fields already reduced to plain text.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    /// Identity key for dedup; entries without it are never stored.
    pub link: Option<String>,
    /// Short plain-text snippet (RSS `description`, Atom `summary`).
    pub description: Option<String>,
    /// Full body (RSS `content:encoded`, Atom `content`).
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Download and parse the feed at `url`.
    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>>;
    fn name(&self) -> &'static str;
}
