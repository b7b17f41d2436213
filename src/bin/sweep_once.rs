//! One sweep over all active feed sources followed by one scan of pending items.
//! Meant for cron: exits non-zero when the store is unreachable.

use misinfo_monitor::{detect::scan_pending, ingest::run_sweep, init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let state = AppState::from_env()?;

    let sweep = run_sweep(state.store.as_ref(), state.fetcher.as_ref()).await?;
    let scan = scan_pending(state.store.as_ref(), &state.scorer, state.batch_size).await?;

    println!(
        "sweep: {} sources ({} failed), {} new items; scan: {} scanned, {} suspected",
        sweep.sources, sweep.failed_sources, sweep.inserted, scan.scanned, scan.suspected
    );
    Ok(())
}
