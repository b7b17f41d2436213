//! Misinformation monitor server binary.
//! Boots the Axum HTTP server with the JSON API and `/metrics`.

use misinfo_monitor::{api, init_tracing, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let state = AppState::from_env()?;
    let metrics = Metrics::install()?;

    let router = api::router(state).merge(metrics.router());
    Ok(router.into())
}
