use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Opaque product identifier.
///
/// Remote stores may hand out integer keys while locally created products use
/// v4 UUIDs, so the wire form accepts either a JSON string or a JSON integer.
/// It is always serialized back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh v4 UUID identifier for locally owned products.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => Self(value),
            RawId::Number(value) => Self(value.to_string()),
        })
    }
}

/// A catalog entry as held by the UI and returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
}

impl Product {
    /// Merge an edit form over this product, keeping its identifier.
    pub fn apply_form(&self, form: &ProductForm) -> Result<Product, ValidationError> {
        Ok(form.coerce()?.into_product(self.id.clone()))
    }
}

/// Coerced input for creating a product. Has no identifier yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: u32,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Raw form-layer handoff: everything is still text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    /// Prefill a form for editing an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: Some(product.description.clone().unwrap_or_default()),
            price: product.price.normalize().to_string(),
            stock: product.stock.to_string(),
        }
    }

    /// Numeric coercion at the form boundary.
    ///
    /// `name` must be non-empty, `price` must parse as a decimal, `stock`
    /// defaults to 0 when blank. A blank description becomes `None`.
    pub fn coerce(&self) -> Result<NewProduct, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        Ok(NewProduct {
            name: name.to_string(),
            description: normalize_description(self.description.as_deref()),
            price: parse_price(&self.price)?,
            stock: parse_stock(&self.stock)?,
        })
    }
}

/// Trim a free-text description; blank text is stored as `None`.
pub fn normalize_description(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField("price"));
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| ValidationError::invalid_number("price", value))
}

pub fn parse_stock(raw: &str) -> Result<u32, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u32>()
        .map_err(|_| ValidationError::invalid_number("stock", value))
}
