//! Splitjoin - authenticated string split/join API
//!
//! Splits strings into odd/even-position characters and joins them back,
//! remembering each user's last response in a key-value cache.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod transform;

pub use api::{create_router, AppState};
pub use config::Config;
