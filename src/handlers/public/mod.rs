// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, read-only inventory views and the on-demand history rollup.

pub mod auth;
pub mod history;
pub mod inventory;
