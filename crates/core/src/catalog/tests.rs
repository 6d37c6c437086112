use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use super::*;
use crate::errors::{CatalogError, Result};
use crate::products::{NewProduct, Product, ProductForm, ProductId};

/// In-memory stand-in for the REST store.
#[derive(Default)]
struct FakeCatalogApi {
    rows: Mutex<Vec<Product>>,
    next_id: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    list_calls: AtomicUsize,
    /// 1-based `list_products` call that stalls after reading the rows.
    slow_list_call: AtomicUsize,
}

const SLOW_LISTING: Duration = Duration::from_millis(200);

impl FakeCatalogApi {
    fn seeded(rows: Vec<Product>) -> Self {
        let next = rows.len();
        let api = Self::default();
        *api.rows.lock().unwrap() = rows;
        api.next_id.store(next, Ordering::SeqCst);
        api
    }

    fn server_rows(&self) -> Vec<Product> {
        self.rows.lock().unwrap().clone()
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CatalogError::api(500, "Internal Server Error"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeCatalogApi {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CatalogError::transport("connection refused"));
        }
        let rows = self.server_rows();
        if call == self.slow_list_call.load(Ordering::SeqCst) {
            tokio::time::sleep(SLOW_LISTING).await;
        }
        Ok(rows)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        self.check_write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = product.clone().into_product(ProductId::new(id.to_string()));
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, product: &Product) -> Result<Product> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| CatalogError::api(404, "Product not found"))?;
        *slot = product.clone();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| &p.id != id);
        if rows.len() == before {
            return Err(CatalogError::api(404, "Product not found"));
        }
        Ok(())
    }
}

fn product(id: &str, name: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: None,
        price: dec!(100),
        stock,
    }
}

fn new_product(name: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: None,
        price: dec!(49.99),
        stock: 2,
    }
}

fn seeded_remote() -> RemoteCatalog<FakeCatalogApi> {
    RemoteCatalog::new(FakeCatalogApi::seeded(vec![
        product("1", "iPhone 15", 3),
        product("2", "MacBook Air", 1),
    ]))
}

// ─────────────────────────────────────────────────────────────────────────
// Remote policy
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remote_load_replaces_collection_wholesale() {
    let catalog = seeded_remote();
    assert!(catalog.products().is_empty());

    catalog.load().await.unwrap();
    assert_eq!(catalog.products(), catalog.api().server_rows());
    assert_eq!(catalog.policy(), CatalogPolicy::Remote);
}

#[tokio::test]
async fn remote_mutations_end_in_a_fresh_listing() {
    let catalog = seeded_remote();
    catalog.load().await.unwrap();

    catalog.add(new_product("Sony WH-1000XM5")).await.unwrap();
    assert_eq!(catalog.products(), catalog.api().server_rows());
    assert_eq!(catalog.products().len(), 3);

    let mut edited = catalog.products()[0].clone();
    edited.stock = 0;
    catalog.update(edited).await.unwrap();
    assert_eq!(catalog.products(), catalog.api().server_rows());
    assert_eq!(catalog.products()[0].stock, 0);

    catalog.delete(&ProductId::new("2")).await.unwrap();
    assert_eq!(catalog.products(), catalog.api().server_rows());

    // mount + one re-fetch per mutation
    assert_eq!(catalog.api().list_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn remote_failed_mutation_leaves_collection_untouched() {
    let catalog = seeded_remote();
    catalog.load().await.unwrap();
    let before = catalog.products();
    catalog.api().fail_writes.store(true, Ordering::SeqCst);

    let err = catalog.add(new_product("Router")).await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));

    let mut edited = before[0].clone();
    edited.name = "renamed".to_string();
    assert!(catalog.update(edited).await.is_err());
    assert!(catalog.delete(&ProductId::new("1")).await.is_err());

    assert_eq!(catalog.products(), before);
    // no re-fetch after a failed write
    assert_eq!(catalog.api().list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn remote_failed_reload_keeps_previous_listing() {
    let catalog = seeded_remote();
    catalog.load().await.unwrap();
    let before = catalog.products();
    catalog.api().fail_reads.store(true, Ordering::SeqCst);

    let err = catalog.add(new_product("Router")).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)));
    assert_eq!(catalog.products(), before);
}

#[tokio::test]
async fn remote_rapid_updates_settle_on_server_state() {
    let catalog = Arc::new(seeded_remote());
    catalog.load().await.unwrap();
    // the reload after the first update reads the rows, then stalls
    catalog.api().slow_list_call.store(2, Ordering::SeqCst);

    let mut first = catalog.products()[0].clone();
    first.stock = 10;
    let mut second = first.clone();
    second.stock = 20;

    let slow = {
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move { catalog.update(first).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    catalog.update(second).await.unwrap();
    slow.await.unwrap().unwrap();

    let server = catalog.api().server_rows();
    assert_eq!(server[0].stock, 20);
    assert_eq!(catalog.products(), server);
}

#[tokio::test]
async fn remote_stale_listing_is_not_applied() {
    let catalog = Arc::new(seeded_remote());
    catalog.api().slow_list_call.store(1, Ordering::SeqCst);

    let slow = {
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move { catalog.load().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    catalog.add(new_product("Router")).await.unwrap();
    slow.await.unwrap().unwrap();

    assert_eq!(catalog.products().len(), 3);
    assert_eq!(catalog.products(), catalog.api().server_rows());
}

#[tokio::test]
async fn remote_delete_of_unknown_id_is_a_noop() {
    let catalog = seeded_remote();
    catalog.load().await.unwrap();
    let before = catalog.products();

    catalog.delete(&ProductId::new("missing")).await.unwrap();

    assert_eq!(catalog.products(), before);
    assert_eq!(catalog.api().list_calls.load(Ordering::SeqCst), 1);
}

// ─────────────────────────────────────────────────────────────────────────
// Local policy
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn local_add_appends_with_fresh_unique_id() {
    let catalog = LocalCatalog::with_products(vec![product("a", "Cable", 1)]);
    let prior_ids: Vec<ProductId> = catalog.products().into_iter().map(|p| p.id).collect();

    catalog.add(new_product("Router")).await.unwrap();

    let products = catalog.products();
    assert_eq!(products.len(), prior_ids.len() + 1);
    let added = products.last().unwrap();
    assert_eq!(added.name, "Router");
    assert!(!prior_ids.contains(&added.id));
    assert_eq!(catalog.policy(), CatalogPolicy::Local);
}

#[tokio::test]
async fn local_router_scenario() {
    let catalog = LocalCatalog::new();
    let form = ProductForm {
        name: "Router".to_string(),
        description: Some(String::new()),
        price: "1999".to_string(),
        stock: String::new(),
    };

    catalog.add(form.coerce().unwrap()).await.unwrap();

    let products = catalog.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].description, None);
    assert_eq!(products[0].price, dec!(1999));
    assert_eq!(products[0].stock, 0);
}

#[tokio::test]
async fn local_update_changes_exactly_one_entry() {
    let catalog = LocalCatalog::with_products(vec![
        product("a", "iPhone 15", 3),
        product("b", "Samsung S24", 4),
        product("c", "Sony WH-1000XM5", 5),
    ]);
    let before = catalog.products();

    let mut edited = before[1].clone();
    edited.price = dec!(899);
    catalog.update(edited.clone()).await.unwrap();

    let after = catalog.products();
    assert_eq!(after.len(), before.len());
    assert_eq!(after[1], edited);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
}

#[tokio::test]
async fn local_unknown_ids_are_noops() {
    let catalog = LocalCatalog::with_products(vec![product("a", "Cable", 1)]);
    let before = catalog.products();

    catalog.delete(&ProductId::new("missing")).await.unwrap();
    catalog.update(product("missing", "Ghost", 0)).await.unwrap();
    catalog.load().await.unwrap();

    assert_eq!(catalog.products(), before);
}

#[tokio::test]
async fn policies_are_interchangeable_behind_the_trait() {
    let catalogs: Vec<Arc<dyn CatalogSync>> = vec![
        Arc::new(seeded_remote()),
        Arc::new(LocalCatalog::new()),
    ];

    for catalog in catalogs {
        catalog.load().await.unwrap();
        let before = catalog.products().len();
        catalog.add(new_product("Charger")).await.unwrap();
        let products = catalog.products();
        assert_eq!(products.len(), before + 1);

        let added = products
            .iter()
            .find(|p| p.name == "Charger")
            .cloned()
            .unwrap();
        catalog.delete(&added.id).await.unwrap();
        assert_eq!(catalog.products().len(), before);
    }
}
