//! Catalog capability interface and the remote store port.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, Result};
use crate::products::{NewProduct, Product, ProductId};

/// Which store of record backs the product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogPolicy {
    /// Server-authoritative: every write goes to the REST store, then re-fetches.
    #[default]
    Remote,
    /// Local-authoritative: in-memory only, identifiers generated on insert.
    Local,
}

impl CatalogPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for CatalogPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Remote catalog store (`/products`).
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// GET /products
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// POST /products
    async fn create_product(&self, product: &NewProduct) -> Result<Product>;

    /// PUT /products/{id}
    async fn update_product(&self, product: &Product) -> Result<Product>;

    /// DELETE /products/{id}
    async fn delete_product(&self, id: &ProductId) -> Result<()>;
}

/// The product list the UI renders, plus the mutations it may request.
///
/// Implementations differ only in which store is authoritative; callers must
/// not depend on which one they hold.
#[async_trait]
pub trait CatalogSync: Send + Sync {
    fn policy(&self) -> CatalogPolicy;

    /// Snapshot of the current collection in display order.
    fn products(&self) -> Vec<Product>;

    async fn load(&self) -> Result<()>;

    async fn add(&self, input: NewProduct) -> Result<()>;

    async fn update(&self, product: Product) -> Result<()>;

    async fn delete(&self, id: &ProductId) -> Result<()>;
}
