//! Product domain models and the ordered in-memory collection.

mod product_collection;
mod products_model;

pub use product_collection::*;
pub use products_model::*;
