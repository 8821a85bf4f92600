pub mod activity;
pub mod backup;
pub mod history;
pub mod inventory;
pub mod requests;
pub mod upload;

pub use activity::ActivityLogger;
pub use backup::{BackupReport, BackupService};
pub use history::HistoryTracker;
pub use inventory::{InventoryError, InventoryService, TransferOutcome};
