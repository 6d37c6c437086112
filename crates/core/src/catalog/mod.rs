//! Catalog synchronization policies.

mod catalog_traits;
mod local_catalog;
mod remote_catalog;

pub use catalog_traits::*;
pub use local_catalog::*;
pub use remote_catalog::*;

#[cfg(test)]
mod tests;
