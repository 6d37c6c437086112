//! Storefront domain: product catalog synchronization and chat session state.
//!
//! This crate holds no I/O. The REST client and the WebSocket driver live in
//! `storefront-catalog-client` and `storefront-chat` and plug into the traits
//! and state types defined here.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod errors;
pub mod products;

pub use errors::{CatalogError, ConfigError, Result, ValidationError};
