// src/ingest/providers/fixture.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;

use crate::ingest::parse::parse_feed;
use crate::ingest::types::{FeedEntry, FeedFetcher};

/// Serves canned feed documents keyed by URL. Unknown URLs fail like a dead host.
#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    docs: HashMap<String, String>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, xml: &str) -> Self {
        self.docs.insert(url.to_string(), xml.to_string());
        self
    }

    pub fn insert(&mut self, url: &str, xml: &str) {
        self.docs.insert(url.to_string(), xml.to_string());
    }
}

#[async_trait]
impl FeedFetcher for FixtureFetcher {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let xml = self
            .docs
            .get(url)
            .ok_or_else(|| anyhow!("no fixture for {url}"))?;
        parse_feed(xml).with_context(|| format!("parsing fixture {url}"))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
