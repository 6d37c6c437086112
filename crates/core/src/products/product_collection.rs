use log::warn;

use super::products_model::{Product, ProductId};

/// Ordered product list with unique identifiers.
///
/// Insertion order is display order. Every mutation is keyed by id and leaves
/// the position of untouched entries alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCollection {
    items: Vec<Product>,
}

impl ProductCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a store listing, keeping the first entry for
    /// any repeated id.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut collection = Self::new();
        collection.replace_all(products);
        collection
    }

    /// Replace the whole collection with a fresh listing.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.items.clear();
        self.items.reserve(products.len());
        for product in products {
            if self.contains(&product.id) {
                warn!("[Catalog] Dropping duplicate product id {} from listing", product.id);
                continue;
            }
            self.items.push(product);
        }
    }

    /// Append a product. Returns false (and leaves the collection alone) when
    /// the id is already taken.
    pub fn push(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Replace the entry with the same id in place.
    pub fn replace(&mut self, product: Product) -> bool {
        match self.items.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|p| &p.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.items.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<Product> {
        self.items.clone()
    }
}
