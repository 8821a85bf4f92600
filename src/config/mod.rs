use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub storage: StorageConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub scheduler: SchedulerConfig,
    pub history: HistoryConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub backup_retention_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// bcrypt cost for newly stored password hashes
    pub password_hash_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// UTC wall-clock time of the daily run
    pub run_at_hour: u32,
    pub run_at_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub window_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Oldest entries are dropped once the log grows past this many. `None` keeps everything.
    pub max_entries: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Storage overrides
        if let Ok(v) = env::var("STORAGE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("STORAGE_BACKUP_DIR") {
            self.storage.backup_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("STORAGE_BACKUP_RETENTION_DAYS") {
            self.storage.backup_retention_days = v.parse().unwrap_or(self.storage.backup_retention_days);
        }

        // API overrides
        if let Some(port) = env::var("STOCKROOM_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_PASSWORD_HASH_COST") {
            self.security.password_hash_cost = v.parse().unwrap_or(self.security.password_hash_cost);
        }

        // Scheduler overrides
        if let Ok(v) = env::var("SCHEDULER_ENABLED") {
            self.scheduler.enabled = v.parse().unwrap_or(self.scheduler.enabled);
        }
        if let Ok(v) = env::var("SCHEDULER_RUN_AT_HOUR") {
            self.scheduler.run_at_hour = v.parse().unwrap_or(self.scheduler.run_at_hour);
        }
        if let Ok(v) = env::var("SCHEDULER_RUN_AT_MINUTE") {
            self.scheduler.run_at_minute = v.parse().unwrap_or(self.scheduler.run_at_minute);
        }

        if let Ok(v) = env::var("HISTORY_WINDOW_DAYS") {
            self.history.window_days = v.parse().unwrap_or(self.history.window_days);
        }
        if let Ok(v) = env::var("AUDIT_MAX_ENTRIES") {
            self.audit.max_entries = v.parse().ok();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
                backup_dir: PathBuf::from("./data/backups"),
                backup_retention_days: 7,
            },
            api: ApiConfig {
                port: 5000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "development-only-secret".to_string(),
                jwt_expiry_hours: 1,
                password_hash_cost: bcrypt::DEFAULT_COST,
            },
            scheduler: SchedulerConfig {
                enabled: true,
                run_at_hour: 0,
                run_at_minute: 0,
            },
            history: HistoryConfig { window_days: 7 },
            audit: AuditConfig { max_entries: None },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            storage: StorageConfig {
                data_dir: PathBuf::from("/var/lib/stockroom"),
                backup_dir: PathBuf::from("/var/lib/stockroom/backups"),
                backup_retention_days: 7,
            },
            api: ApiConfig {
                port: 5000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                // Must be supplied through SECURITY_JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 1,
                password_hash_cost: bcrypt::DEFAULT_COST,
            },
            scheduler: SchedulerConfig {
                enabled: true,
                run_at_hour: 0,
                run_at_minute: 0,
            },
            history: HistoryConfig { window_days: 7 },
            audit: AuditConfig { max_entries: None },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            storage: StorageConfig {
                data_dir: PathBuf::from("/var/lib/stockroom"),
                backup_dir: PathBuf::from("/var/lib/stockroom/backups"),
                backup_retention_days: 7,
            },
            api: ApiConfig {
                port: 5000,
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 1,
                password_hash_cost: bcrypt::DEFAULT_COST,
            },
            scheduler: SchedulerConfig {
                enabled: true,
                run_at_hour: 0,
                run_at_minute: 0,
            },
            history: HistoryConfig { window_days: 7 },
            audit: AuditConfig { max_entries: None },
        }
    }

    /// Development defaults rooted at `data_dir`, scheduler off. Used by tests and tooling.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let mut config = Self::development();
        config.storage.backup_dir = data_dir.join("backups");
        config.storage.data_dir = data_dir;
        config.scheduler.enabled = false;
        config.api.enable_request_logging = false;
        config.security.password_hash_cost = crate::auth::password::MIN_COST;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.port, 5000);
        assert_eq!(config.security.jwt_expiry_hours, 1);
        assert_eq!(config.history.window_days, 7);
        assert!(config.audit.max_entries.is_none());
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.storage.backup_retention_days, 7);
        assert_eq!(config.security.password_hash_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_audit_log_is_uncapped_in_every_preset() {
        for config in [AppConfig::development(), AppConfig::staging(), AppConfig::production()] {
            assert!(config.audit.max_entries.is_none(), "{:?}", config.environment);
        }
    }

    #[test]
    fn test_for_data_dir_roots_backups_inside() {
        let config = AppConfig::for_data_dir("/tmp/stockroom-test");
        assert_eq!(config.storage.backup_dir, PathBuf::from("/tmp/stockroom-test/backups"));
        assert!(!config.scheduler.enabled);
        assert_eq!(config.security.password_hash_cost, crate::auth::password::MIN_COST);
    }
}
