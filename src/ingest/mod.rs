// src/ingest/mod.rs
pub mod parse;
pub mod providers;
pub mod types;

use anyhow::Result;
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::ingest::types::{FeedEntry, FeedFetcher};
use crate::store::{ContentStore, NewContentItem, RssSource, ScanStatus};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_entries_total", "Entries parsed from feed documents.");
        describe_counter!("ingest_inserted_total", "New content items stored.");
        describe_counter!(
            "ingest_duplicates_total",
            "Entries skipped because their URL was already stored."
        );
        describe_counter!(
            "ingest_missing_link_total",
            "Entries skipped because they had no link."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Feed sources that failed to download or parse."
        );
        describe_counter!("ingest_http_errors_total", "Feed HTTP transport errors.");
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("ingest_last_sweep_ts", "Unix ts when the last sweep finished.");
    });
}

/// Reduce feed markup to plain text: decode entities, strip tags, ASCII quotes,
/// collapse whitespace.
pub fn plain_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Outcome of one sweep. Only logged; callers see plain success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub sources: usize,
    pub failed_sources: usize,
    pub entries: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub missing_link: usize,
}

/// Map a feed entry to a pending content row for `source_id`.
pub fn new_content_item(source_id: &str, entry: FeedEntry, link: String) -> NewContentItem {
    NewContentItem {
        source_id: source_id.to_string(),
        title: entry.title.unwrap_or_default(),
        content_text: entry.content.or_else(|| entry.description.clone()),
        description: entry.description,
        url: link,
        published_at: Some(entry.published_at.unwrap_or_else(Utc::now)),
        scan_status: ScanStatus::Pending,
    }
}

/// One pass over every active source.
///
/// Sources run one after another. A feed that fails to download or parse is
/// logged and skipped (its `last_fetched` is left alone); any store error aborts
/// the sweep and is returned.
pub async fn run_sweep(store: &dyn ContentStore, fetcher: &dyn FeedFetcher) -> Result<SweepReport> {
    ensure_metrics_described();

    let sources = store.active_sources().await?;
    let mut report = SweepReport {
        sources: sources.len(),
        ..Default::default()
    };

    for source in &sources {
        let entries = match fetcher.fetch_feed(&source.url).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    source = %source.name,
                    url = %source.url,
                    fetcher = fetcher.name(),
                    "feed fetch failed, skipping source"
                );
                counter!("ingest_source_errors_total").increment(1);
                report.failed_sources += 1;
                continue;
            }
        };

        ingest_source(store, source, entries, &mut report).await?;
    }

    counter!("ingest_inserted_total").increment(report.inserted as u64);
    counter!("ingest_duplicates_total").increment(report.duplicates as u64);
    counter!("ingest_missing_link_total").increment(report.missing_link as u64);
    gauge!("ingest_last_sweep_ts").set(Utc::now().timestamp() as f64);

    tracing::info!(
        target: "ingest",
        sources = report.sources,
        failed = report.failed_sources,
        entries = report.entries,
        inserted = report.inserted,
        duplicates = report.duplicates,
        missing_link = report.missing_link,
        "sweep finished"
    );

    Ok(report)
}

async fn ingest_source(
    store: &dyn ContentStore,
    source: &RssSource,
    entries: Vec<FeedEntry>,
    report: &mut SweepReport,
) -> Result<()> {
    let fetched = entries.len() as u64;
    report.entries += entries.len();

    for mut entry in entries {
        let Some(link) = entry.link.take() else {
            report.missing_link += 1;
            continue;
        };
        if store.content_exists(&link).await? {
            report.duplicates += 1;
            continue;
        }
        tracing::debug!(source = %source.name, url = %link, "new content item");
        store
            .insert_content(new_content_item(&source.id, entry, link))
            .await?;
        report.inserted += 1;
    }

    let total = source.total_articles_fetched.saturating_add(fetched);
    store.record_fetch(&source.id, Utc::now(), total).await?;
    Ok(())
}
