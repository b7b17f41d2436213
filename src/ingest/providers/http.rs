// src/ingest/providers/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;

use crate::ingest::parse::parse_feed;
use crate::ingest::types::{FeedEntry, FeedFetcher};

/// Downloads feeds over HTTP. No retry and no timeout beyond the client's own.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    /// The client's user agent and pool are shared with the store.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                counter!("ingest_http_errors_total").increment(1);
                return Err(e).with_context(|| format!("GET {url}"));
            }
        };
        let body = resp
            .error_for_status()
            .with_context(|| format!("GET {url}"))?
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;
        parse_feed(&body).with_context(|| format!("parsing feed {url}"))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
