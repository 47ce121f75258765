//! Sports Cache - logo, image and fixture caching for a sports-data service
//!
//! Provides TTL caches with fallback for team logos, league logos and
//! country flags, a JSON API client with stale-on-error caching, a debug
//! sink, and the server-side fixture cache in front of the upstream API.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod debug;
pub mod error;
pub mod fixtures;
pub mod images;
pub mod logos;
pub mod models;
pub mod tasks;
pub mod validation;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
