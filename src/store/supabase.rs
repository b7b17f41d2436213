// src/store/supabase.rs
//! REST-backed store for the hosted Postgres project (`/rest/v1/<table>`).

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ContentItem, ContentStore, NewContentItem, NewRssSource, RssSource, ScanUpdate};

const SOURCES: &str = "rss_sources";
const ITEMS: &str = "content_items";

pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print the key
        f.debug_struct("SupabaseStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SupabaseStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("misinfo-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building store http client")?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    /// Reuse an existing client (shared connection pool).
    pub fn with_client(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn table(&self, name: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, name)
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, rb: RequestBuilder, what: &str) -> Result<Response> {
        let resp = self
            .authed(rb)
            .send()
            .await
            .with_context(|| format!("store request failed: {what}"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("store {what}: HTTP {status}: {body}");
        }
        Ok(resp)
    }

    async fn rows<T: DeserializeOwned>(&self, rb: RequestBuilder, what: &str) -> Result<Vec<T>> {
        self.send(rb, what)
            .await?
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("decoding store response: {what}"))
    }
}

#[async_trait::async_trait]
impl ContentStore for SupabaseStore {
    async fn active_sources(&self) -> Result<Vec<RssSource>> {
        let rb = self
            .http
            .get(self.table(SOURCES))
            .query(&[("select", "*"), ("is_active", "eq.true")]);
        self.rows(rb, "list active sources").await
    }

    async fn add_source(&self, source: NewRssSource) -> Result<RssSource> {
        let rb = self
            .http
            .post(self.table(SOURCES))
            .header("Prefer", "return=representation")
            .json(&source);
        self.rows::<RssSource>(rb, "insert source")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("store returned no row for inserted source"))
    }

    async fn content_exists(&self, url: &str) -> Result<bool> {
        #[derive(Deserialize)]
        struct IdRow {
            #[allow(dead_code)]
            id: serde_json::Value,
        }
        let filter = format!("eq.{url}");
        let rb = self.http.get(self.table(ITEMS)).query(&[
            ("select", "id"),
            ("url", filter.as_str()),
            ("limit", "1"),
        ]);
        let rows: Vec<IdRow> = self.rows(rb, "content exists").await?;
        Ok(!rows.is_empty())
    }

    async fn insert_content(&self, item: NewContentItem) -> Result<ContentItem> {
        let rb = self
            .http
            .post(self.table(ITEMS))
            .header("Prefer", "return=representation")
            .json(&item);
        self.rows::<ContentItem>(rb, "insert content")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("store returned no row for inserted content"))
    }

    async fn record_fetch(
        &self,
        source_id: &str,
        fetched_at: DateTime<Utc>,
        total_articles_fetched: u64,
    ) -> Result<()> {
        let filter = format!("eq.{source_id}");
        let rb = self
            .http
            .patch(self.table(SOURCES))
            .query(&[("id", filter.as_str())])
            .json(&serde_json::json!({
                "last_fetched": fetched_at,
                "total_articles_fetched": total_articles_fetched,
            }));
        self.send(rb, "record fetch").await?;
        Ok(())
    }

    async fn pending_items(&self, limit: usize) -> Result<Vec<ContentItem>> {
        let limit = limit.to_string();
        let rb = self.http.get(self.table(ITEMS)).query(&[
            ("select", "*"),
            ("scan_status", "eq.pending"),
            ("order", "published_at.desc.nullslast"),
            ("limit", limit.as_str()),
        ]);
        self.rows(rb, "list pending items").await
    }

    async fn update_scan(&self, id: &str, update: ScanUpdate) -> Result<()> {
        let filter = format!("eq.{id}");
        let rb = self
            .http
            .patch(self.table(ITEMS))
            .query(&[("id", filter.as_str())])
            .json(&update);
        self.send(rb, "update scan").await?;
        Ok(())
    }
}
