pub mod backup;
pub mod history;
pub mod user;
