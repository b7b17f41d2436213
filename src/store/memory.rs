// src/store/memory.rs
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};

use super::{
    ContentItem, ContentStore, NewContentItem, NewRssSource, RssSource, ScanUpdate,
    SourceCategory,
};

/// Process-local store. URL uniqueness is enforced like a unique index.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    sources: Vec<RssSource>,
    items: Vec<ContentItem>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with active sources (name, url), all `election_news`.
    pub fn with_sources<I, N, U>(sources: I) -> Self
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<String>,
        U: Into<String>,
    {
        let store = Self::new();
        {
            let mut t = store.lock();
            for (name, url) in sources {
                let id = t.next_id();
                t.sources.push(RssSource {
                    id,
                    name: name.into(),
                    url: url.into(),
                    category: SourceCategory::ElectionNews,
                    credibility_score: 0.75,
                    is_active: true,
                    last_fetched: None,
                    total_articles_fetched: 0,
                });
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Every write is a single push or field update, so a poisoned lock is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of all stored items, insertion order.
    pub fn items(&self) -> Vec<ContentItem> {
        self.lock().items.clone()
    }

    /// Snapshot of all sources, active or not.
    pub fn sources(&self) -> Vec<RssSource> {
        self.lock().sources.clone()
    }

    pub fn set_active(&self, source_id: &str, active: bool) -> Result<()> {
        let mut t = self.lock();
        let src = t
            .sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or_else(|| anyhow!("unknown source {source_id}"))?;
        src.is_active = active;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentStore for InMemoryStore {
    async fn active_sources(&self) -> Result<Vec<RssSource>> {
        Ok(self
            .lock()
            .sources
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }

    async fn add_source(&self, source: NewRssSource) -> Result<RssSource> {
        let mut t = self.lock();
        let id = t.next_id();
        let row = RssSource {
            id,
            name: source.name,
            url: source.url,
            category: source.category,
            credibility_score: source.credibility_score,
            is_active: true,
            last_fetched: None,
            total_articles_fetched: 0,
        };
        t.sources.push(row.clone());
        Ok(row)
    }

    async fn content_exists(&self, url: &str) -> Result<bool> {
        Ok(self.lock().items.iter().any(|i| i.url == url))
    }

    async fn insert_content(&self, item: NewContentItem) -> Result<ContentItem> {
        let mut t = self.lock();
        if t.items.iter().any(|i| i.url == item.url) {
            bail!("duplicate content url {}", item.url);
        }
        let id = t.next_id();
        let row = ContentItem {
            id,
            source_id: item.source_id,
            title: item.title,
            description: item.description,
            url: item.url,
            published_at: item.published_at,
            content_text: item.content_text,
            scan_status: item.scan_status,
            scanned_at: None,
            is_misinformation: None,
            misinformation_confidence: None,
            misinformation_type: None,
            severity_level: None,
        };
        t.items.push(row.clone());
        Ok(row)
    }

    async fn record_fetch(
        &self,
        source_id: &str,
        fetched_at: DateTime<Utc>,
        total_articles_fetched: u64,
    ) -> Result<()> {
        let mut t = self.lock();
        let src = t
            .sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or_else(|| anyhow!("unknown source {source_id}"))?;
        src.last_fetched = Some(fetched_at);
        src.total_articles_fetched = src.total_articles_fetched.max(total_articles_fetched);
        Ok(())
    }

    async fn pending_items(&self, limit: usize) -> Result<Vec<ContentItem>> {
        let t = self.lock();
        let mut out: Vec<ContentItem> = t
            .items
            .iter()
            .filter(|i| i.scan_status == super::ScanStatus::Pending)
            .cloned()
            .collect();
        // Newest first; undated items last.
        out.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        out.truncate(limit);
        Ok(out)
    }

    async fn update_scan(&self, id: &str, update: ScanUpdate) -> Result<()> {
        let mut t = self.lock();
        let item = t
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| anyhow!("unknown content item {id}"))?;
        if let Some(s) = update.scan_status {
            item.scan_status = s;
        }
        if let Some(v) = update.scanned_at {
            item.scanned_at = Some(v);
        }
        if let Some(v) = update.is_misinformation {
            item.is_misinformation = Some(v);
        }
        if let Some(v) = update.misinformation_confidence {
            item.misinformation_confidence = Some(v);
        }
        if let Some(v) = update.misinformation_type {
            item.misinformation_type = Some(v);
        }
        if let Some(v) = update.severity_level {
            item.severity_level = Some(v);
        }
        Ok(())
    }
}
