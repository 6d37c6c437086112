//! REST transport for the storefront catalog.
//!
//! [`CatalogClient`] implements [`storefront_core::catalog::CatalogApi`] over
//! the `/products` endpoints; [`build_catalog`] wires the configured policy.

pub mod client;
pub mod compose;
pub mod error;

pub use client::CatalogClient;
pub use compose::build_catalog;
pub use error::{ApiRetryClass, CatalogClientError, Result};
