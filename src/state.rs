use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::services::{ActivityLogger, BackupService, HistoryTracker, InventoryService};
use crate::store::{Store, StoreError};

/// Shared handles given to every handler, the auth middleware and the scheduler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<Store>,
    pub auth: AuthService,
    pub inventory: InventoryService,
    pub activity: ActivityLogger,
    pub backup: Arc<BackupService>,
    pub history: HistoryTracker,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store = Arc::new(Store::open(&config.storage.data_dir)?);
        let history = HistoryTracker::new(config.history.window_days);

        Ok(Self {
            auth: AuthService::new(
                store.clone(),
                &config.security.jwt_secret,
                config.security.jwt_expiry_hours,
            ),
            inventory: InventoryService::new(store.clone(), history),
            activity: ActivityLogger::new(store.clone(), config.audit.max_entries),
            backup: Arc::new(BackupService::new(
                store.clone(),
                &config.storage.backup_dir,
                config.storage.backup_retention_days,
            )),
            history,
            store,
            config: Arc::new(config),
        })
    }
}
