//! Local-authoritative catalog for demo and offline use.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use log::debug;

use super::catalog_traits::{CatalogPolicy, CatalogSync};
use crate::errors::Result;
use crate::products::{NewProduct, Product, ProductCollection, ProductId};

/// Product list that is its own store of record.
///
/// Every mutation lands immediately and never fails.
#[derive(Debug, Default)]
pub struct LocalCatalog {
    products: RwLock<ProductCollection>,
}

impl LocalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog with existing products.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(ProductCollection::from_products(products)),
        }
    }
}

#[async_trait]
impl CatalogSync for LocalCatalog {
    fn policy(&self) -> CatalogPolicy {
        CatalogPolicy::Local
    }

    fn products(&self) -> Vec<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .to_vec()
    }

    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn add(&self, input: NewProduct) -> Result<()> {
        let mut guard = self.products.write().unwrap_or_else(PoisonError::into_inner);
        let mut id = ProductId::generate();
        while guard.contains(&id) {
            id = ProductId::generate();
        }
        debug!("[Catalog] Added local product {}", id);
        guard.push(input.into_product(id));
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<()> {
        let id = product.id.clone();
        let mut guard = self.products.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.replace(product) {
            debug!("[Catalog] Update ignored, no local product {}", id);
        }
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<()> {
        let mut guard = self.products.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.remove(id) {
            debug!("[Catalog] Delete ignored, no local product {}", id);
        }
        Ok(())
    }
}
