use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use storefront_core::products::{NewProduct, Product, ProductCollection, ProductId};
use tokio::sync::RwLock;

/// Storage for catalog rows.
#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    async fn list(&self) -> Vec<Product>;
    async fn get(&self, id: &ProductId) -> Option<Product>;
    async fn insert(&self, new_product: NewProduct) -> Product;
    async fn update(&self, id: &ProductId, changes: NewProduct) -> Option<Product>;
    async fn delete(&self, id: &ProductId) -> bool;
}

/// Process-local product table with sequential integer keys.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    rows: RwLock<ProductCollection>,
    last_id: AtomicI64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepositoryTrait for InMemoryProductRepository {
    async fn list(&self) -> Vec<Product> {
        self.rows.read().await.to_vec()
    }

    async fn get(&self, id: &ProductId) -> Option<Product> {
        self.rows.read().await.get(id).cloned()
    }

    async fn insert(&self, new_product: NewProduct) -> Product {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = new_product.into_product(ProductId::from(id));
        self.rows.write().await.push(product.clone());
        product
    }

    async fn update(&self, id: &ProductId, changes: NewProduct) -> Option<Product> {
        let mut rows = self.rows.write().await;
        let updated = changes.into_product(id.clone());
        rows.replace(updated.clone()).then_some(updated)
    }

    async fn delete(&self, id: &ProductId) -> bool {
        self.rows.write().await.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price: dec!(10),
            stock: 0,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_in_insert_order() {
        let repo = InMemoryProductRepository::new();
        let first = repo.insert(input("iPhone 15")).await;
        let second = repo.insert(input("MacBook Air")).await;

        assert_eq!(first.id.as_str(), "1");
        assert_eq!(second.id.as_str(), "2");
        assert_eq!(repo.list().await, vec![first, second]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        let first = repo.insert(input("Cable")).await;
        assert!(repo.delete(&first.id).await);
        assert!(!repo.delete(&first.id).await);

        let next = repo.insert(input("Charger")).await;
        assert_eq!(next.id.as_str(), "2");
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.update(&ProductId::new("9"), input("Ghost")).await.is_none());
        assert!(repo.get(&ProductId::new("9")).await.is_none());
    }
}
