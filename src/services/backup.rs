use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::store::{write_json_atomic, Store, StoreError};

/// What a backup run wrote and removed
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackupReport {
    pub written: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

/// Daily copies of the inventory and warehouse documents with age-based retention
pub struct BackupService {
    store: Arc<Store>,
    backup_dir: PathBuf,
    retention_days: i64,
}

impl BackupService {
    pub fn new(store: Arc<Store>, backup_dir: impl Into<PathBuf>, retention_days: i64) -> Self {
        Self {
            store,
            backup_dir: backup_dir.into(),
            retention_days,
        }
    }

    /// Write today's snapshots, then prune archives older than the retention window.
    ///
    /// Snapshots are taken from the live documents, so a backup never captures a
    /// half-applied mutation.
    pub async fn run(&self, today: NaiveDate) -> Result<BackupReport, StoreError> {
        let mut report = BackupReport::default();

        let inventory = self.store.inventory.snapshot().await;
        let inventory_dest = self.backup_dir.join(format!("inventory-{}.json", today));
        write_json_atomic(&inventory_dest, &inventory)?;
        report.written.push(inventory_dest);

        let warehouses = self.store.warehouses.snapshot().await;
        let warehouses_dest = self.backup_dir.join(format!("warehouses-{}.json", today));
        write_json_atomic(&warehouses_dest, &warehouses)?;
        report.written.push(warehouses_dest);

        info!("Backup completed for {}", today);

        report.removed = self.prune(today)?;
        Ok(report)
    }

    fn prune(&self, today: NaiveDate) -> Result<Vec<PathBuf>, StoreError> {
        let cutoff = today - Duration::days(self.retention_days);
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Io { path, source }
        };

        let mut removed = Vec::new();
        for dir_entry in fs::read_dir(&self.backup_dir).map_err(io_err(&self.backup_dir))? {
            let path = dir_entry.map_err(io_err(&self.backup_dir))?.path();
            let Some(date) = path.file_name().and_then(|n| n.to_str()).and_then(archive_date) else {
                continue;
            };
            if date < cutoff {
                match fs::remove_file(&path) {
                    Ok(()) => {
                        info!("Deleted old backup: {}", path.display());
                        removed.push(path);
                    }
                    Err(e) => warn!("Failed to delete old backup {}: {}", path.display(), e),
                }
            }
        }
        Ok(removed)
    }
}

/// First `YYYY-MM-DD` date embedded in a file name
fn archive_date(file_name: &str) -> Option<NaiveDate> {
    let bytes = file_name.as_bytes();
    (0..bytes.len().saturating_sub(9)).find_map(|start| {
        let candidate = file_name.get(start..start + 10)?;
        if !candidate.as_bytes()[0].is_ascii_digit() {
            return None;
        }
        NaiveDate::parse_from_str(candidate, "%Y-%m-%d").ok()
    })
}
