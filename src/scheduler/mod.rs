use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{error, info, warn};

use crate::services::history::today_utc;
use crate::state::AppState;
use crate::types::ActivityEntry;

/// Next occurrence of `hour:minute` UTC strictly after `now`
pub fn next_run_after(now: DateTime<Utc>, hour: u32, minute: u32) -> DateTime<Utc> {
    let at = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// The daily maintenance pass: history rollup then backup with retention.
///
/// Both steps go through the same document locks as API requests. A failure in
/// one step is logged and does not skip the other.
pub async fn run_daily_jobs(state: &AppState) {
    let today = today_utc();

    match state.inventory.rollup_history(today).await {
        Ok(updated) => {
            state
                .activity
                .record(ActivityEntry::new("scheduler", "history_rollup").with("updated", updated))
                .await;
        }
        Err(e) => error!("Error in daily history update: {}", e),
    }

    match state.backup.run(today).await {
        Ok(report) => info!(
            "Daily backup wrote {} files, removed {} expired",
            report.written.len(),
            report.removed.len()
        ),
        Err(e) => error!("Backup failed: {}", e),
    }
}

/// Run the daily jobs forever at the configured time. Spawned by the server.
pub async fn run_scheduler(state: AppState) {
    let hour = state.config.scheduler.run_at_hour;
    let minute = state.config.scheduler.run_at_minute;
    if hour > 23 || minute > 59 {
        warn!("Invalid scheduler time {:02}:{:02}, falling back to 00:00", hour, minute);
    }
    info!("Daily jobs scheduled at {:02}:{:02} UTC", hour, minute);

    loop {
        let now = Utc::now();
        let next = next_run_after(now, hour, minute);
        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        run_daily_jobs(&state).await;
    }
}
