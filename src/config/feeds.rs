// src/config/feeds.rs
use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::parse_or;

const ENV_PATH: &str = "FEED_SOURCES_PATH";

/// A feed polled by the live summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

/// Live-feed summarizer settings.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub sources: Vec<FeedSource>,
    pub items_per_source: usize,
    pub result_limit: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            items_per_source: 2,
            result_limit: 12,
        }
    }
}

impl FeedSettings {
    /// Limits from env, source list from [`load_sources_default`].
    pub fn from_env() -> Result<Self> {
        let lookup = super::env_lookup;
        let d = Self::default();
        Ok(Self {
            sources: load_sources_default()?,
            items_per_source: parse_or(&lookup, "FEED_ITEMS_PER_SOURCE", d.items_per_source),
            result_limit: parse_or(&lookup, "FEED_RESULT_LIMIT", d.result_limit),
        })
    }
}

/// Election and politics feeds the dashboard shipped with.
pub fn default_sources() -> Vec<FeedSource> {
    [
        ("ABP Elections", "https://www.abplive.com/elections/feed"),
        (
            "Zee News National",
            "https://zeenews.india.com/rss/india-national-news.xml",
        ),
        ("Republic Politics", "https://www.republicworld.com/rss/politics.xml"),
        ("Republic Elections", "https://www.republicworld.com/rss/elections.xml"),
        (
            "India TV Politics",
            "https://www.indiatvnews.com/rssnews/topstory-politics.xml",
        ),
        ("CNN Politics", "http://rss.cnn.com/rss/cnn_allpolitics.rss"),
        (
            "DD News Political",
            "https://ddnewsportal.com/rss/category/Political",
        ),
        (
            "Hindustan Times India",
            "https://www.hindustantimes.com/feeds/rss/india-news/rssfeed.xml",
        ),
    ]
    .into_iter()
    .map(|(name, url)| FeedSource {
        name: name.to_string(),
        url: url.to_string(),
    })
    .collect()
}

/// Load a source list from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<Vec<FeedSource>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Files tried, in order, when `$FEED_SOURCES_PATH` is unset.
const SEARCH_PATHS: [&str; 2] = ["config/feed_sources.toml", "config/feed_sources.json"];

/// `$FEED_SOURCES_PATH` (must exist), else the first of [`SEARCH_PATHS`] found,
/// else the built-in [`default_sources`].
pub fn load_sources_default() -> Result<Vec<FeedSource>> {
    if let Some(p) = super::env_lookup(ENV_PATH) {
        let path = PathBuf::from(p);
        ensure!(path.exists(), "{ENV_PATH} points to non-existent path {}", path.display());
        return load_sources_from(&path);
    }
    match SEARCH_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        Some(path) => load_sources_from(path),
        None => Ok(default_sources()),
    }
}

/// The extension decides the format; anything else is tried as JSON, then TOML.
fn parse_sources(s: &str, ext: &str) -> Result<Vec<FeedSource>> {
    let list = match ext {
        "toml" => parse_toml(s)?,
        "json" => parse_json(s)?,
        _ => parse_json(s)
            .or_else(|_| parse_toml(s))
            .map_err(|_| anyhow!("unsupported feed sources format"))?,
    };
    Ok(clean_list(list))
}

fn parse_toml(s: &str) -> Result<Vec<FeedSource>> {
    #[derive(Deserialize)]
    struct TomlSources {
        sources: Vec<FeedSource>,
    }
    let v: TomlSources = toml::from_str(s).context("parsing feed sources toml")?;
    Ok(v.sources)
}

fn parse_json(s: &str) -> Result<Vec<FeedSource>> {
    serde_json::from_str(s).context("parsing feed sources json")
}

/// Trim, drop blank entries and repeated URLs (first one wins).
fn clean_list(items: Vec<FeedSource>) -> Vec<FeedSource> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter_map(|it| {
            let name = it.name.trim().to_string();
            let url = it.url.trim().to_string();
            if name.is_empty() || url.is_empty() || !seen.insert(url.clone()) {
                return None;
            }
            Some(FeedSource { name, url })
        })
        .collect()
}
