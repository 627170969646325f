//! # Application Token Service Library
//!
//! Provides functionality for acquiring OAuth2 application tokens via
//! the client-credentials grant, caching them with their computed
//! expiry, and handing them out to authorized clients.
//!
//! Modules:
//! - `config` — service configuration and credential resolution
//! - `cache` — token record and cache manager
//! - `provider` — identity provider client and wire shapes
//! - `store` — single-record persistent store

pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod provider;
pub mod server;
pub mod store;
pub mod tests;
pub mod utils;

pub use crate::cache::manager::TokenCacheManager;
pub use crate::config::settings::ServiceConfig;
pub use crate::error::AuthError;
