//! Composition root for the catalog: picks exactly one synchronization policy.

use std::sync::Arc;

use log::info;
use storefront_core::catalog::{CatalogPolicy, CatalogSync, LocalCatalog, RemoteCatalog};
use storefront_core::config::StorefrontConfig;

use crate::client::CatalogClient;
use crate::error::Result;

/// Build the catalog the view will render from.
///
/// The policy is fixed here for the lifetime of the returned handle; the two
/// policies are never wired against the same view.
pub fn build_catalog(config: &StorefrontConfig) -> Result<Arc<dyn CatalogSync>> {
    match config.catalog_policy {
        CatalogPolicy::Remote => {
            let client = CatalogClient::new(&config.api_url)?;
            info!(
                "[Catalog] Using server-authoritative catalog at {}",
                client.base_url()
            );
            Ok(Arc::new(RemoteCatalog::new(client)))
        }
        CatalogPolicy::Local => {
            info!("[Catalog] Using local-authoritative catalog");
            Ok(Arc::new(LocalCatalog::new()))
        }
    }
}
