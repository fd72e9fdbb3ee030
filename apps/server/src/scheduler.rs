//! Background retention sweep for the cache and call log.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Spawns a task that purges expired rows every `every`. The first sweep
/// runs immediately.
pub fn start_retention_sweeper(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Retention sweeper started ({}s interval)", every.as_secs());
        let mut ticker = interval(every);

        loop {
            ticker.tick().await;
            run_sweep(&state).await;
        }
    });
}

async fn run_sweep(state: &AppState) {
    match state.stock_data_service.purge_expired().await {
        Ok(report) if report.cache_entries == 0 && report.api_calls == 0 => {
            debug!("Retention sweep: nothing to purge");
        }
        Ok(report) => info!(
            "Retention sweep removed {} cache entries and {} call records",
            report.cache_entries, report.api_calls
        ),
        Err(e) => warn!("Retention sweep failed: {}", e),
    }
}
