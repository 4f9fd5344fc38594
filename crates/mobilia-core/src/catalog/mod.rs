//! Catalog repository trait and criteria-to-filter construction.

pub mod filter;
pub mod repository;

pub use repository::{CatalogRepository, IndexableProduct, ReviewRepository};
