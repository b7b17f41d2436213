// src/store/mod.rs
//! Content store: feed sources and ingested content items.
//!
//! The hosted database is reached through [`supabase::SupabaseStore`];
//! [`memory::InMemoryStore`] keeps the same semantics in process for local runs
//! and tests. Callers only see the [`ContentStore`] trait.

pub mod memory;
pub mod supabase;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::InMemoryStore;
pub use supabase::SupabaseStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    ElectionNews,
    FactCheckers,
    MainstreamMedia,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RssSource {
    pub id: String,
    pub name: String,
    pub url: String,
    pub category: SourceCategory,
    pub credibility_score: f32,
    pub is_active: bool,
    #[serde(default)]
    pub last_fetched: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_articles_fetched: u64,
}

/// Insert payload for a new feed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRssSource {
    pub name: String,
    pub url: String,
    pub category: SourceCategory,
    pub credibility_score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Scanning,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub source_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content_text: Option<String>,
    pub scan_status: ScanStatus,
    #[serde(default)]
    pub scanned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_misinformation: Option<bool>,
    #[serde(default)]
    pub misinformation_confidence: Option<f32>,
    #[serde(default)]
    pub misinformation_type: Option<String>,
    #[serde(default)]
    pub severity_level: Option<Severity>,
}

/// Insert payload for a freshly ingested item. Always created as `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContentItem {
    pub source_id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub content_text: Option<String>,
    pub scan_status: ScanStatus,
}

/// Partial update written by the scanner. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_status: Option<ScanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_misinformation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misinformation_confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misinformation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_level: Option<Severity>,
}

impl ScanUpdate {
    pub fn status(status: ScanStatus) -> Self {
        Self {
            scan_status: Some(status),
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Sources with `is_active = true`.
    async fn active_sources(&self) -> Result<Vec<RssSource>>;

    async fn add_source(&self, source: NewRssSource) -> Result<RssSource>;

    /// Whether an item with exactly this URL is already stored.
    async fn content_exists(&self, url: &str) -> Result<bool>;

    async fn insert_content(&self, item: NewContentItem) -> Result<ContentItem>;

    /// Stamp a source as fetched and store its new running article total.
    async fn record_fetch(
        &self,
        source_id: &str,
        fetched_at: DateTime<Utc>,
        total_articles_fetched: u64,
    ) -> Result<()>;

    /// Up to `limit` pending items, newest `published_at` first.
    async fn pending_items(&self, limit: usize) -> Result<Vec<ContentItem>>;

    async fn update_scan(&self, id: &str, update: ScanUpdate) -> Result<()>;
}
