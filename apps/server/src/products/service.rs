use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_core::products::{normalize_description, NewProduct, Product, ProductId};
use tracing::info;

use super::repository::ProductRepositoryTrait;
use crate::error::{ApiError, ApiResult};

const MAX_NAME_CHARS: usize = 255;
const MAX_DESCRIPTION_CHARS: usize = 1000;

/// JSON body accepted by `PUT /products/{id}`.
///
/// Clients send the full product; an `id` in the body is ignored in favour of
/// the path.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
}

impl From<ProductPayload> for NewProduct {
    fn from(payload: ProductPayload) -> Self {
        NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock,
        }
    }
}

/// Catalog rules on top of the repository.
pub struct ProductService {
    repository: Arc<dyn ProductRepositoryTrait>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Enforce store-side rules: name of 1..=255 chars, description of at most
    /// 1000 chars, price above zero. Trims name and description.
    pub fn validate(product: NewProduct) -> ApiResult<NewProduct> {
        let name = product.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ApiError::Validation(format!(
                "name must be at most {} characters",
                MAX_NAME_CHARS
            )));
        }
        let description = normalize_description(product.description.as_deref());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_CHARS)
        {
            return Err(ApiError::Validation(format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_CHARS
            )));
        }
        if product.price <= Decimal::ZERO {
            return Err(ApiError::Validation("price must be greater than 0".to_string()));
        }

        Ok(NewProduct {
            name,
            description,
            price: product.price,
            stock: product.stock,
        })
    }

    pub async fn list(&self) -> Vec<Product> {
        self.repository.list().await
    }

    pub async fn get(&self, id: &ProductId) -> ApiResult<Product> {
        self.repository
            .get(id)
            .await
            .ok_or_else(ApiError::product_not_found)
    }

    pub async fn create(&self, product: NewProduct) -> ApiResult<Product> {
        let product = Self::validate(product)?;
        let created = self.repository.insert(product).await;
        info!("Created product {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update(&self, id: &ProductId, changes: NewProduct) -> ApiResult<Product> {
        let changes = Self::validate(changes)?;
        let updated = self
            .repository
            .update(id, changes)
            .await
            .ok_or_else(ApiError::product_not_found)?;
        info!("Updated product {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &ProductId) -> ApiResult<()> {
        if !self.repository.delete(id).await {
            return Err(ApiError::product_not_found());
        }
        info!("Deleted product {}", id);
        Ok(())
    }
}
