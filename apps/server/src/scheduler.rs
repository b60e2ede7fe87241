//! Background end-of-day scheduler.
//!
//! Advances the simulation by one full business day on a fixed interval.
//! Disabled when `BO_EOD_INTERVAL_SECS` is 0.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::main_lib::AppState;
use backoffice_core::constants::SYSTEM_USER;

/// Starts the scheduler unless the interval is zero.
pub fn start_end_of_day_scheduler(state: Arc<AppState>, interval_secs: u64) {
    if interval_secs == 0 {
        info!("End-of-day scheduler disabled");
        return;
    }

    tokio::spawn(async move {
        info!("End-of-day scheduler started ({}s interval)", interval_secs);

        let mut ticker = interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_scheduled_day(&state).await;
        }
    });
}

/// Runs one scheduled day advance.
async fn run_scheduled_day(state: &Arc<AppState>) {
    let service = state.end_of_day_service.clone();
    let result = tokio::task::spawn_blocking(move || service.advance_full_day(SYSTEM_USER)).await;

    match result {
        Ok(Ok(summary)) => {
            info!(
                "Scheduled day advance {} -> {}: {} orders moved, valuation {}",
                summary.previous_date,
                summary.simulation.current_date,
                summary.settlement.orders_advanced(),
                match (&summary.valuation, &summary.valuation_error) {
                    (Some(v), _) => format!("stored for {} clients", v.valued),
                    (None, Some(e)) => format!("skipped ({})", e),
                    (None, None) => "skipped".to_string(),
                }
            );
        }
        Ok(Err(e)) => warn!("Scheduled day advance failed: {}", e),
        Err(e) => warn!("Scheduled day advance task panicked: {}", e),
    }
}
