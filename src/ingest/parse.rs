// src/ingest/parse.rs
//! Feed document parsing: RSS 2.0, RSS 1.0 (RDF) and Atom 1.0.
//!
//! The root element picks the reader. Namespaced extras (`media:*`, `atom:link`,
//! `dc:creator`, ...) are left to the reader crates and never fail an item.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::events::Event;
use quick_xml::Reader;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use super::plain_text;
use super::types::FeedEntry;

/// Parse a feed document of any supported flavour.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let t0 = std::time::Instant::now();
    let cleaned = scrub_html_entities_for_xml(xml);
    let root = root_element(&cleaned).ok_or_else(|| anyhow!("feed document has no root element"))?;

    let entries: Vec<FeedEntry> = match root.as_str() {
        "rss" | "rdf:RDF" | "RDF" => {
            let channel = rss::Channel::read_from(cleaned.as_bytes()).context("parsing rss xml")?;
            channel.items().iter().map(rss_entry).collect()
        }
        "feed" => {
            let feed =
                atom_syndication::Feed::read_from(cleaned.as_bytes()).context("parsing atom xml")?;
            feed.entries().iter().map(atom_entry).collect()
        }
        other => return Err(anyhow!("unsupported feed root element <{other}>")),
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_parse_ms").record(ms);
    counter!("ingest_entries_total").increment(entries.len() as u64);
    Ok(entries)
}

fn rss_entry(item: &rss::Item) -> FeedEntry {
    let date = item.pub_date().or_else(|| {
        item.dublin_core_ext()
            .and_then(|dc| dc.dates().first())
            .map(String::as_str)
    });
    FeedEntry {
        title: clean_opt(item.title()),
        link: non_blank(item.link()),
        description: clean_opt(item.description()),
        content: clean_opt(item.content()),
        published_at: date.and_then(parse_date),
    }
}

fn atom_entry(entry: &atom_syndication::Entry) -> FeedEntry {
    // a missing <updated> reads back as the epoch
    let date = entry
        .published()
        .unwrap_or_else(|| entry.updated())
        .with_timezone(&Utc);
    FeedEntry {
        title: clean_opt(Some(entry.title().value.as_str())),
        link: primary_link(entry.links()),
        description: clean_opt(entry.summary().map(|t| t.value.as_str())),
        content: clean_opt(entry.content().and_then(|c| c.value())),
        published_at: Some(date).filter(|d| d.timestamp() != 0),
    }
}

/// `rel="alternate"` (the default when rel is absent) wins over other relations.
fn primary_link(links: &[atom_syndication::Link]) -> Option<String> {
    links
        .iter()
        .filter(|l| l.rel() == "alternate")
        .find_map(|l| non_blank(Some(l.href())))
        .or_else(|| links.iter().find_map(|l| non_blank(Some(l.href()))))
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn clean_opt(s: Option<&str>) -> Option<String> {
    s.map(plain_text).filter(|v| !v.is_empty())
}

/// RFC 2822 (RSS) or RFC 3339 (Atom, Dublin Core). Unparsable → `None`.
pub fn parse_date(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    match OffsetDateTime::parse(ts, &Rfc2822).or_else(|_| OffsetDateTime::parse(ts, &Rfc3339)) {
        Ok(odt) => DateTime::from_timestamp(odt.unix_timestamp(), odt.nanosecond()),
        // chrono is laxer about obsolete zone names ("EST", "PDT")
        Err(_) => DateTime::parse_from_rfc2822(ts)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
    }
}

/// Name of the first element, e.g. `rss`, `feed`, `rdf:RDF`.
fn root_element(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

/// HTML entities that feeds use but XML does not define.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
