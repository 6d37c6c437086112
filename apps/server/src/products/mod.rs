//! Product catalog storage and rules.

mod repository;
mod service;

pub use repository::*;
pub use service::*;
