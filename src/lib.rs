pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod scheduler;
pub mod server;
pub mod services;
pub mod state;
pub mod store;
pub mod types;
