// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod analyze;
pub mod api;
pub mod config;
pub mod detect;
pub mod feed;
pub mod ingest;
pub mod metrics;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{AnalysisInput, AnalysisResult, RiskScorer, Verdict};
pub use crate::api::{router, AppState};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs filtered by `RUST_LOG` (default `misinfo_monitor=info,warn`).
/// No-op if the host already installed a global subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("misinfo_monitor=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
