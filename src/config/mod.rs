// src/config/mod.rs
//! Environment-driven configuration.
//!
//! Every loader has a `from_lookup` variant taking a key → value closure so tests
//! can feed a map instead of touching the process environment.

pub mod analysis;
pub mod feeds;
pub mod store;

use std::str::FromStr;

pub use analysis::ScorerConfig;
pub use feeds::{FeedSettings, FeedSource};
pub use store::StoreConfig;

/// Read and parse `key`; missing → `default`, unparsable → `default` with a warning.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) if raw.trim().is_empty() => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, ?default, "unparsable config value, using default");
                default
            }
        },
    }
}

/// Non-empty, trimmed string value.
pub(crate) fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lookup backed by `std::env`.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
