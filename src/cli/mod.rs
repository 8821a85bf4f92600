pub mod commands;
pub mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Stockroom CLI - Maintenance commands for the inventory data directory")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Data directory (overrides STORAGE_DATA_DIR)")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Manage API user accounts")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Stock history maintenance")]
    History {
        #[command(subcommand)]
        cmd: commands::history::HistoryCommands,
    },

    #[command(about = "Snapshot backups of the data files")]
    Backup {
        #[command(subcommand)]
        cmd: commands::backup::BackupCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Effective configuration for a CLI run: environment config with the `--data-dir` override
pub fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = crate::config::config().clone();
    if let Some(dir) = &cli.data_dir {
        config.storage.backup_dir = dir.join("backups");
        config.storage.data_dir = dir.clone();
    }
    config
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let state = AppState::new(resolve_config(&cli))?;

    match cli.command {
        Commands::User { cmd } => commands::user::handle(cmd, &state, output_format).await,
        Commands::History { cmd } => commands::history::handle(cmd, &state, output_format).await,
        Commands::Backup { cmd } => commands::backup::handle(cmd, &state, output_format).await,
    }
}
