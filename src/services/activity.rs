use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use crate::store::{Store, StoreError};
use crate::types::ActivityEntry;

/// Append-only audit trail of administrative actions
#[derive(Clone)]
pub struct ActivityLogger {
    store: Arc<Store>,
    max_entries: Option<usize>,
}

impl ActivityLogger {
    pub fn new(store: Arc<Store>, max_entries: Option<usize>) -> Self {
        Self { store, max_entries }
    }

    /// Append an entry, stamping it with the server time when it carries none.
    pub async fn try_append(&self, mut entry: ActivityEntry) -> Result<ActivityEntry, StoreError> {
        if entry.timestamp.is_none() {
            entry.timestamp = Some(Utc::now());
        }
        let max_entries = self.max_entries;

        self.store
            .activity
            .mutate(|log| {
                log.push(entry.clone());
                if let Some(max) = max_entries {
                    if log.len() > max {
                        let excess = log.len() - max;
                        log.drain(..excess);
                    }
                }
                Ok(entry)
            })
            .await
    }

    /// Best-effort append used after a primary mutation has already succeeded.
    /// Failures are logged and otherwise ignored.
    pub async fn record(&self, entry: ActivityEntry) {
        let action = entry.action.clone();
        if let Err(e) = self.try_append(entry).await {
            warn!("Failed to write activity log entry '{}': {}", action, e);
        }
    }

    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.store.activity.snapshot().await
    }
}
