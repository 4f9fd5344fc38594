//! Catalog repository trait.
//!
//! Read-only access to the product catalog. Uses RPITIT; the SQLite
//! implementation lives in mobilia-infra.

use mobilia_types::catalog::{Category, NewReview, ProductCard, ProductDetail, ProductReview};
use mobilia_types::error::RepositoryError;
use mobilia_types::search::ProductFilter;

/// An active product paired with its primary image reference, ready for
/// feature extraction.
#[derive(Debug, Clone)]
pub struct IndexableProduct {
    pub card: ProductCard,
    pub image_path: String,
}

/// Read-only catalog access.
pub trait CatalogRepository: Send + Sync {
    /// Every active product that has a designated primary image.
    fn list_active_with_primary_image(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<IndexableProduct>, RepositoryError>> + Send;

    /// Active products matching the extracted criteria filter, ordered
    /// featured-first then newest-first, capped at `limit`.
    fn search_by_criteria(
        &self,
        filter: &ProductFilter,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ProductCard>, RepositoryError>> + Send;

    /// Names of all active categories, for prompt vocabulary.
    fn category_names(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Names of all colors, for prompt vocabulary.
    fn color_names(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// All active categories.
    fn list_categories(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Category>, RepositoryError>> + Send;

    /// Product cards, optionally narrowed by category slug and/or a name
    /// substring.
    fn list_products(
        &self,
        category_slug: Option<&str>,
        search: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<ProductCard>, RepositoryError>> + Send;

    /// Full detail for one product, or `None` when the slug is unknown.
    fn get_product_by_slug(
        &self,
        slug: &str,
    ) -> impl std::future::Future<Output = Result<Option<ProductDetail>, RepositoryError>> + Send;
}

/// Review reads and writes, kept apart from the read-only catalog seam so
/// catalog stubs stay small.
pub trait ReviewRepository: Send + Sync {
    /// Approved reviews for one product, newest first.
    fn reviews_for_product(
        &self,
        product_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ProductReview>, RepositoryError>> + Send;

    /// Persist a review. Fails with `RepositoryError::Conflict` when the
    /// reviewer has already reviewed this product.
    fn add_review(
        &self,
        product_id: i64,
        review: &NewReview,
    ) -> impl std::future::Future<Output = Result<ProductReview, RepositoryError>> + Send;
}
