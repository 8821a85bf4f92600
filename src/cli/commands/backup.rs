use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::services::history::today_utc;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum BackupCommands {
    #[command(about = "Write today's snapshots and prune expired ones")]
    Run,
}

pub async fn handle(
    cmd: BackupCommands,
    state: &AppState,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        BackupCommands::Run => {
            let report = state.backup.run(today_utc()).await?;
            output_success(
                &output_format,
                &format!(
                    "Backup wrote {} files, removed {} expired",
                    report.written.len(),
                    report.removed.len()
                ),
                Some(json!({
                    "written": report.written,
                    "removed": report.removed,
                })),
            )
        }
    }
}
