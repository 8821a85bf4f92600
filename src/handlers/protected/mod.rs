// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every mutating inventory operation lives here. Each handler performs its
// mutation first and then records an activity log entry attributed to the
// authenticated caller; a failed log write never fails the request.

pub mod activity;
pub mod auth;
pub mod products;
pub mod stock;
pub mod warehouses;
