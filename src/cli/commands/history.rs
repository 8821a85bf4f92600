use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::services::history::today_utc;
use crate::state::AppState;
use crate::types::ActivityEntry;

#[derive(Subcommand)]
pub enum HistoryCommands {
    #[command(about = "Append today's stock to every product history and trim old entries")]
    Rollup {
        #[arg(long, help = "Roll up as of this date (YYYY-MM-DD, defaults to today UTC)")]
        date: Option<NaiveDate>,
    },
}

pub async fn handle(
    cmd: HistoryCommands,
    state: &AppState,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        HistoryCommands::Rollup { date } => {
            let today = date.unwrap_or_else(today_utc);
            let updated = state.inventory.rollup_history(today).await?;
            state
                .activity
                .record(ActivityEntry::new("cli", "history_rollup").with("updated", updated))
                .await;

            output_success(
                &output_format,
                &format!("History rolled up for {} ({} products updated)", today, updated),
                Some(json!({ "date": today, "updated": updated })),
            )
        }
    }
}
