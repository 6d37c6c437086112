//! Server-authoritative catalog: re-fetch-on-write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use log::{debug, error};

use super::catalog_traits::{CatalogApi, CatalogPolicy, CatalogSync};
use crate::errors::Result;
use crate::products::{NewProduct, Product, ProductCollection, ProductId};

/// Product list mirrored from a remote store.
///
/// Nothing is applied optimistically. A mutation goes to the store first; only
/// after it succeeds is the whole list reloaded, so the local copy is always
/// some complete `GET /products` result. A failed call leaves the list as it
/// was.
///
/// Every reload takes a ticket before it asks the store. A listing is applied
/// only if its ticket is newer than the one already shown, so a slow reload
/// that finishes after a later one cannot put older rows back on screen.
pub struct RemoteCatalog<A> {
    api: A,
    products: RwLock<Listing>,
    next_ticket: AtomicU64,
}

#[derive(Default)]
struct Listing {
    ticket: u64,
    products: ProductCollection,
}

impl<A: CatalogApi> RemoteCatalog<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            products: RwLock::new(Listing::default()),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Apply a listing fetched under `ticket`. Returns false if a newer
    /// listing is already applied.
    fn replace_products(&self, ticket: u64, products: Vec<Product>) -> bool {
        let mut guard = self.products.write().unwrap_or_else(PoisonError::into_inner);
        if ticket <= guard.ticket {
            return false;
        }
        guard.ticket = ticket;
        guard.products.replace_all(products);
        true
    }
}

#[async_trait]
impl<A: CatalogApi> CatalogSync for RemoteCatalog<A> {
    fn policy(&self) -> CatalogPolicy {
        CatalogPolicy::Remote
    }

    fn products(&self) -> Vec<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .products
            .to_vec()
    }

    async fn load(&self) -> Result<()> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        match self.api.list_products().await {
            Ok(products) => {
                let count = products.len();
                if self.replace_products(ticket, products) {
                    debug!("[Catalog] Loaded {} products from store", count);
                } else {
                    debug!("[Catalog] Dropped stale listing #{}", ticket);
                }
                Ok(())
            }
            Err(err) => {
                error!("[Catalog] Failed to load products: {}", err);
                Err(err)
            }
        }
    }

    async fn add(&self, input: NewProduct) -> Result<()> {
        let created = self.api.create_product(&input).await.map_err(|err| {
            error!("[Catalog] Failed to add product '{}': {}", input.name, err);
            err
        })?;
        debug!("[Catalog] Store created product {}", created.id);
        self.load().await
    }

    async fn update(&self, product: Product) -> Result<()> {
        self.api.update_product(&product).await.map_err(|err| {
            error!("[Catalog] Failed to update product {}: {}", product.id, err);
            err
        })?;
        debug!("[Catalog] Store updated product {}", product.id);
        self.load().await
    }

    async fn delete(&self, id: &ProductId) -> Result<()> {
        match self.api.delete_product(id).await {
            Ok(()) => {}
            // already gone from the store, nothing to reload
            Err(err) if err.status_code() == Some(404) => {
                debug!("[Catalog] Delete of unknown product {} ignored", id);
                return Ok(());
            }
            Err(err) => {
                error!("[Catalog] Failed to delete product {}: {}", id, err);
                return Err(err);
            }
        }
        debug!("[Catalog] Store deleted product {}", id);
        self.load().await
    }
}
