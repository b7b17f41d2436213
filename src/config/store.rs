// src/config/store.rs
use super::{non_empty, parse_or};

/// Connection settings for the hosted store's REST endpoint.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`. `None` selects the in-memory store.
    pub url: Option<String>,
    /// Service-role key when present, otherwise the anon key.
    pub api_key: Option<String>,
    /// Pending items read per scan.
    pub batch_size: usize,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(super::env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(&lookup, "SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string());
        let api_key = non_empty(&lookup, "SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|| non_empty(&lookup, "SUPABASE_ANON_KEY"));
        Self {
            url,
            api_key,
            batch_size: parse_or(&lookup, "MONITOR_BATCH_SIZE", 50usize),
        }
    }

    /// Both URL and key are needed to talk to the hosted store.
    pub fn remote(&self) -> Option<(&str, &str)> {
        match (self.url.as_deref(), self.api_key.as_deref()) {
            (Some(u), Some(k)) => Some((u, k)),
            _ => None,
        }
    }
}
