//! SQLite catalog repository implementation.
//!
//! Implements `CatalogRepository` from `mobilia-core` with raw queries,
//! private Row structs, and the split reader/writer pool. Criteria search
//! builds its WHERE clause dynamically: each populated filter group becomes
//! one AND-ed clause whose terms are OR-combined, mirroring substring
//! matching (SQLite `LIKE` is case-insensitive for ASCII).

use chrono::{DateTime, Utc};
use sqlx::Row;

use mobilia_core::catalog::repository::{CatalogRepository, IndexableProduct, ReviewRepository};
use mobilia_types::catalog::{Category, NewReview, Product, ProductCard, ProductDetail, ProductReview};
use mobilia_types::error::RepositoryError;
use mobilia_types::search::ProductFilter;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CatalogRepository`.
pub struct SqliteCatalogRepository {
    pool: DatabasePool,
}

impl SqliteCatalogRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Product row joined with its category name.
struct ProductRow {
    id: i64,
    name: String,
    slug: String,
    description: String,
    short_description: String,
    category_id: i64,
    price: f64,
    sale_price: Option<f64>,
    sku: String,
    stock_quantity: i64,
    is_active: i64,
    is_featured: i64,
    is_on_sale: i64,
    created_at: String,
    updated_at: String,
    category_name: String,
    average_rating: Option<f64>,
    review_count: i64,
}

impl ProductRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            short_description: row.try_get("short_description")?,
            category_id: row.try_get("category_id")?,
            price: row.try_get("price")?,
            sale_price: row.try_get("sale_price")?,
            sku: row.try_get("sku")?,
            stock_quantity: row.try_get("stock_quantity")?,
            is_active: row.try_get("is_active")?,
            is_featured: row.try_get("is_featured")?,
            is_on_sale: row.try_get("is_on_sale")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            category_name: row.try_get("category_name")?,
            average_rating: row.try_get("average_rating")?,
            review_count: row.try_get("review_count")?,
        })
    }

    fn into_product(self) -> Result<(Product, String), RepositoryError> {
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;
        let product = Product {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            short_description: self.short_description,
            category_id: self.category_id,
            price: self.price,
            sale_price: self.sale_price,
            sku: self.sku,
            stock_quantity: self.stock_quantity,
            is_active: self.is_active != 0,
            is_featured: self.is_featured != 0,
            is_on_sale: self.is_on_sale != 0,
            created_at,
            updated_at,
        };
        Ok((product, self.category_name))
    }
}

struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    description: String,
    is_active: i64,
    created_at: String,
}

impl CategoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_category(self) -> Result<Category, RepositoryError> {
        Ok(Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            is_active: self.is_active != 0,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// Review aggregates ride along as correlated subselects so every card query
// carries them without an extra round trip.
const PRODUCT_SELECT: &str = "SELECT p.*, c.name AS category_name, \
     (SELECT ROUND(AVG(r.rating), 1) FROM product_reviews r \
      WHERE r.product_id = p.id AND r.is_approved = 1) AS average_rating, \
     (SELECT COUNT(*) FROM product_reviews r \
      WHERE r.product_id = p.id AND r.is_approved = 1) AS review_count \
     FROM products p JOIN categories c ON c.id = p.category_id";

impl SqliteCatalogRepository {
    async fn colors_for(&self, product_id: i64) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT col.name FROM product_colors pc \
             JOIN colors col ON col.id = pc.color_id \
             WHERE pc.product_id = ? ORDER BY col.name",
        )
        .bind(product_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn primary_image(&self, product_id: i64) -> Result<Option<String>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT image_path FROM product_images WHERE product_id = ? AND is_primary = 1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;
        Ok(row.map(|r| r.0))
    }

    async fn images_for(&self, product_id: i64) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT image_path FROM product_images WHERE product_id = ? \
             ORDER BY is_primary DESC, position, id",
        )
        .bind(product_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn card_from_row(&self, row: ProductRow) -> Result<ProductCard, RepositoryError> {
        let (average_rating, review_count) = (row.average_rating, row.review_count);
        let (product, category) = row.into_product()?;
        let colors = self.colors_for(product.id).await?;
        let main_image = self.primary_image(product.id).await?;
        Ok(ProductCard::from_product(&product, category, colors, main_image)
            .with_review_stats(average_rating, review_count))
    }

    async fn cards_from_rows(
        &self,
        rows: Vec<sqlx::sqlite::SqliteRow>,
    ) -> Result<Vec<ProductCard>, RepositoryError> {
        let mut cards = Vec::with_capacity(rows.len());
        for row in &rows {
            let product_row = ProductRow::from_row(row).map_err(query_err)?;
            cards.push(self.card_from_row(product_row).await?);
        }
        Ok(cards)
    }
}

// ---------------------------------------------------------------------------
// CatalogRepository implementation
// ---------------------------------------------------------------------------

impl CatalogRepository for SqliteCatalogRepository {
    async fn list_active_with_primary_image(
        &self,
    ) -> Result<Vec<IndexableProduct>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT p.*, c.name AS category_name, pi.image_path, \
             (SELECT ROUND(AVG(r.rating), 1) FROM product_reviews r \
              WHERE r.product_id = p.id AND r.is_approved = 1) AS average_rating, \
             (SELECT COUNT(*) FROM product_reviews r \
              WHERE r.product_id = p.id AND r.is_approved = 1) AS review_count \
             FROM products p \
             JOIN categories c ON c.id = p.category_id \
             JOIN product_images pi ON pi.product_id = p.id AND pi.is_primary = 1 \
             WHERE p.is_active = 1 \
             ORDER BY p.id",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut indexable = Vec::with_capacity(rows.len());
        for row in &rows {
            let image_path: String = row.try_get("image_path").map_err(query_err)?;
            let product_row = ProductRow::from_row(row).map_err(query_err)?;
            let card = self.card_from_row(product_row).await?;
            indexable.push(IndexableProduct { card, image_path });
        }
        Ok(indexable)
    }

    async fn search_by_criteria(
        &self,
        filter: &ProductFilter,
        limit: usize,
    ) -> Result<Vec<ProductCard>, RepositoryError> {
        let mut sql = format!("{PRODUCT_SELECT} WHERE p.is_active = 1");
        let mut binds: Vec<String> = Vec::new();

        if !filter.type_terms.is_empty() {
            let clause = filter
                .type_terms
                .iter()
                .map(|_| "(p.name LIKE ? OR p.description LIKE ? OR p.short_description LIKE ?)")
                .collect::<Vec<_>>()
                .join(" OR ");
            sql.push_str(&format!(" AND ({clause})"));
            for term in &filter.type_terms {
                let pattern = format!("%{term}%");
                binds.extend([pattern.clone(), pattern.clone(), pattern]);
            }
        }

        if !filter.category_terms.is_empty() {
            let clause = filter
                .category_terms
                .iter()
                .map(|_| "(c.name LIKE ? OR c.slug LIKE ?)")
                .collect::<Vec<_>>()
                .join(" OR ");
            sql.push_str(&format!(" AND ({clause})"));
            for term in &filter.category_terms {
                let pattern = format!("%{term}%");
                binds.extend([pattern.clone(), pattern]);
            }
        }

        if !filter.colors.is_empty() {
            let clause = filter
                .colors
                .iter()
                .map(|_| {
                    "EXISTS (SELECT 1 FROM product_colors pc \
                     JOIN colors col ON col.id = pc.color_id \
                     WHERE pc.product_id = p.id AND col.name LIKE ?)"
                })
                .collect::<Vec<_>>()
                .join(" OR ");
            sql.push_str(&format!(" AND ({clause})"));
            for color in &filter.colors {
                binds.push(format!("%{color}%"));
            }
        }

        sql.push_str(" ORDER BY p.is_featured DESC, p.created_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        query = query.bind(limit as i64);

        let rows = query.fetch_all(&self.pool.reader).await.map_err(query_err)?;
        self.cards_from_rows(rows).await
    }

    async fn category_names(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM categories WHERE is_active = 1 ORDER BY name")
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_err)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn color_names(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM colors ORDER BY name")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM categories WHERE is_active = 1 ORDER BY name")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter()
            .map(|row| CategoryRow::from_row(row).map_err(query_err)?.into_category())
            .collect()
    }

    async fn list_products(
        &self,
        category_slug: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<ProductCard>, RepositoryError> {
        let mut sql = format!("{PRODUCT_SELECT} WHERE p.is_active = 1");
        let mut binds: Vec<String> = Vec::new();

        if let Some(slug) = category_slug {
            sql.push_str(" AND c.slug = ?");
            binds.push(slug.to_string());
        }
        if let Some(term) = search {
            sql.push_str(" AND (p.name LIKE ? OR p.short_description LIKE ?)");
            let pattern = format!("%{term}%");
            binds.extend([pattern.clone(), pattern]);
        }
        sql.push_str(" ORDER BY p.is_featured DESC, p.created_at DESC");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        let rows = query.fetch_all(&self.pool.reader).await.map_err(query_err)?;
        self.cards_from_rows(rows).await
    }

    async fn get_product_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let row = sqlx::query(&format!("{PRODUCT_SELECT} WHERE p.slug = ? AND p.is_active = 1"))
            .bind(slug)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let product_row = ProductRow::from_row(&row).map_err(query_err)?;
        let (average_rating, review_count) = (product_row.average_rating, product_row.review_count);
        let (product, category) = product_row.into_product()?;
        let colors = self.colors_for(product.id).await?;
        let main_image = self.primary_image(product.id).await?;
        let images = self.images_for(product.id).await?;
        let reviews = self.reviews_for_product(product.id).await?;

        let card = ProductCard::from_product(&product, category, colors, main_image)
            .with_review_stats(average_rating, review_count);
        Ok(Some(ProductDetail {
            card,
            description: product.description,
            sku: product.sku,
            stock_quantity: product.stock_quantity,
            images,
            reviews,
        }))
    }
}

// ---------------------------------------------------------------------------
// ReviewRepository implementation
// ---------------------------------------------------------------------------

struct ReviewRow {
    id: i64,
    product_id: i64,
    reviewer_name: String,
    rating: i64,
    title: String,
    comment: String,
    created_at: String,
}

impl ReviewRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            reviewer_name: row.try_get("reviewer_name")?,
            rating: row.try_get("rating")?,
            title: row.try_get("title")?,
            comment: row.try_get("comment")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_review(self) -> Result<ProductReview, RepositoryError> {
        Ok(ProductReview {
            id: self.id,
            product_id: self.product_id,
            reviewer_name: self.reviewer_name,
            rating: self.rating,
            title: self.title,
            comment: self.comment,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ReviewRepository for SqliteCatalogRepository {
    async fn reviews_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<ProductReview>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM product_reviews \
             WHERE product_id = ? AND is_approved = 1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(product_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter()
            .map(|row| ReviewRow::from_row(row).map_err(query_err)?.into_review())
            .collect()
    }

    async fn add_review(
        &self,
        product_id: i64,
        review: &NewReview,
    ) -> Result<ProductReview, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO product_reviews \
             (product_id, reviewer_name, rating, title, comment, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(&review.reviewer_name)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.comment)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict(
                "this reviewer has already reviewed this product".to_string(),
            ),
            _ => query_err(e),
        })?;

        Ok(ProductReview {
            id: result.last_insert_rowid(),
            product_id,
            reviewer_name: review.reviewer_name.clone(),
            rating: review.rating,
            title: review.title.clone(),
            comment: review.comment.clone(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_repo(dir: &tempfile::TempDir) -> SqliteCatalogRepository {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();

        sqlx::query(
            "INSERT INTO categories (id, name, slug, description, is_active, created_at) VALUES \
             (1, 'Chairs', 'chairs', '', 1, '2026-01-01T00:00:00Z'), \
             (2, 'Tables', 'tables', '', 1, '2026-01-01T00:00:00Z'), \
             (3, 'Retired', 'retired', '', 0, '2026-01-01T00:00:00Z')",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO colors (id, name, hex_code) VALUES \
             (1, 'Red', '#f00'), (2, 'Walnut', '#59382c')",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        // Three chairs (one featured, one inactive) and one table.
        sqlx::query(
            "INSERT INTO products (id, name, slug, description, short_description, category_id, \
                price, sale_price, sku, stock_quantity, is_active, is_featured, is_on_sale, \
                created_at, updated_at) VALUES \
             (1, 'Oak Armchair', 'oak-armchair', 'an oak armchair', 'solid oak', 1, \
                120.0, NULL, 'CH-1', 4, 1, 0, 0, '2026-02-01T00:00:00Z', '2026-02-01T00:00:00Z'), \
             (2, 'Velvet Lounge Chair', 'velvet-lounge', 'soft velvet', 'lounge comfort', 1, \
                300.0, 240.0, 'CH-2', 2, 1, 1, 1, '2026-01-15T00:00:00Z', '2026-01-15T00:00:00Z'), \
             (3, 'Broken Stool', 'broken-stool', '', '', 1, \
                10.0, NULL, 'CH-3', 0, 0, 0, 0, '2026-03-01T00:00:00Z', '2026-03-01T00:00:00Z'), \
             (4, 'Walnut Dining Table', 'walnut-table', 'a walnut table', 'seats six', 2, \
                800.0, NULL, 'TB-1', 1, 1, 0, 0, '2026-02-10T00:00:00Z', '2026-02-10T00:00:00Z')",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO product_colors (product_id, color_id) VALUES (1, 1), (2, 1), (4, 2)",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO product_images (product_id, image_path, is_primary, position, created_at) VALUES \
             (1, 'products/oak-front.jpg', 1, 0, '2026-02-01T00:00:00Z'), \
             (1, 'products/oak-side.jpg', 0, 1, '2026-02-01T00:00:00Z'), \
             (2, 'products/velvet.jpg', 1, 0, '2026-01-15T00:00:00Z')",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        // Two approved reviews and one unapproved on the oak armchair.
        sqlx::query(
            "INSERT INTO product_reviews \
             (product_id, reviewer_name, rating, title, comment, is_approved, created_at) VALUES \
             (1, 'Mona', 5, 'Sturdy', 'Solid build.', 1, '2026-02-02T00:00:00Z'), \
             (1, 'Karim', 4, '', 'Comfortable.', 1, '2026-02-03T00:00:00Z'), \
             (1, 'Spam Bot', 1, '', 'buy pills', 0, '2026-02-04T00:00:00Z')",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        SqliteCatalogRepository::new(pool)
    }

    #[tokio::test]
    async fn empty_filter_returns_active_featured_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let cards = repo.search_by_criteria(&ProductFilter::default(), 20).await.unwrap();
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        // Featured chair first, then the rest newest-first; inactive excluded.
        assert_eq!(names, vec!["Velvet Lounge Chair", "Walnut Dining Table", "Oak Armchair"]);
    }

    #[tokio::test]
    async fn type_terms_match_name_and_description() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let filter = ProductFilter { type_terms: vec!["armchair".to_string()], ..Default::default() };
        let cards = repo.search_by_criteria(&filter, 20).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].slug, "oak-armchair");

        // Case-insensitive substring
        let filter = ProductFilter { type_terms: vec!["VELVET".to_string()], ..Default::default() };
        let cards = repo.search_by_criteria(&filter, 20).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].slug, "velvet-lounge");
    }

    #[tokio::test]
    async fn color_filter_matches_via_join() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let filter = ProductFilter { colors: vec!["red".to_string()], ..Default::default() };
        let cards = repo.search_by_criteria(&filter, 20).await.unwrap();
        let slugs: Vec<&str> = cards.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["velvet-lounge", "oak-armchair"]);
    }

    #[tokio::test]
    async fn category_terms_match_slug_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let filter = ProductFilter { category_terms: vec!["table".to_string()], ..Default::default() };
        let cards = repo.search_by_criteria(&filter, 20).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].category, "Tables");
    }

    #[tokio::test]
    async fn groups_combine_with_and() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        // Red chairs exist, red tables do not.
        let filter = ProductFilter {
            category_terms: vec!["tables".to_string()],
            colors: vec!["Red".to_string()],
            ..Default::default()
        };
        let cards = repo.search_by_criteria(&filter, 20).await.unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let cards = repo.search_by_criteria(&ProductFilter::default(), 2).await.unwrap();
        assert_eq!(cards.len(), 2);
    }

    #[tokio::test]
    async fn cards_carry_colors_and_primary_image() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let cards = repo.list_products(Some("chairs"), None).await.unwrap();
        let oak = cards.iter().find(|c| c.slug == "oak-armchair").unwrap();
        assert_eq!(oak.colors, vec!["Red".to_string()]);
        assert_eq!(oak.main_image.as_deref(), Some("products/oak-front.jpg"));
        assert_eq!(oak.category, "Chairs");
    }

    #[tokio::test]
    async fn list_products_filters_by_search_term() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let cards = repo.list_products(None, Some("walnut")).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].slug, "walnut-table");
    }

    #[tokio::test]
    async fn product_detail_includes_all_images() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let detail = repo.get_product_by_slug("oak-armchair").await.unwrap().unwrap();
        assert_eq!(detail.images, vec![
            "products/oak-front.jpg".to_string(),
            "products/oak-side.jpg".to_string(),
        ]);
        assert_eq!(detail.sku, "CH-1");
        assert_eq!(detail.card.effective_price, 120.0);

        assert!(repo.get_product_by_slug("no-such-product").await.unwrap().is_none());
        // Inactive products are not exposed
        assert!(repo.get_product_by_slug("broken-stool").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn indexable_products_require_primary_image() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let indexable = repo.list_active_with_primary_image().await.unwrap();
        let slugs: Vec<&str> = indexable.iter().map(|p| p.card.slug.as_str()).collect();
        // The table has no image, the stool is inactive.
        assert_eq!(slugs, vec!["oak-armchair", "velvet-lounge"]);
        assert_eq!(indexable[0].image_path, "products/oak-front.jpg");
    }

    #[tokio::test]
    async fn cards_aggregate_approved_review_stats() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let cards = repo.list_products(Some("chairs"), None).await.unwrap();
        let oak = cards.iter().find(|c| c.slug == "oak-armchair").unwrap();
        // (5 + 4) / 2, unapproved review excluded.
        assert_eq!(oak.average_rating, Some(4.5));
        assert_eq!(oak.review_count, 2);

        let velvet = cards.iter().find(|c| c.slug == "velvet-lounge").unwrap();
        assert_eq!(velvet.average_rating, None);
        assert_eq!(velvet.review_count, 0);
    }

    #[tokio::test]
    async fn product_detail_lists_approved_reviews_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let detail = repo.get_product_by_slug("oak-armchair").await.unwrap().unwrap();
        let names: Vec<&str> = detail.reviews.iter().map(|r| r.reviewer_name.as_str()).collect();
        assert_eq!(names, vec!["Karim", "Mona"]);
        assert_eq!(detail.card.average_rating, Some(4.5));
        assert_eq!(detail.card.review_count, 2);
    }

    #[tokio::test]
    async fn add_review_persists_and_feeds_aggregates() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let review = NewReview {
            reviewer_name: "Lina".to_string(),
            rating: 3,
            title: String::new(),
            comment: "Wobbles a little.".to_string(),
        };
        let saved = repo.add_review(4, &review).await.unwrap();
        assert!(saved.id > 0);
        assert_eq!(saved.rating, 3);

        let detail = repo.get_product_by_slug("walnut-table").await.unwrap().unwrap();
        assert_eq!(detail.card.average_rating, Some(3.0));
        assert_eq!(detail.card.review_count, 1);
        assert_eq!(detail.reviews[0].comment, "Wobbles a little.");
    }

    #[tokio::test]
    async fn add_review_rejects_second_review_from_same_reviewer() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        let review = NewReview {
            reviewer_name: "Mona".to_string(),
            rating: 2,
            title: String::new(),
            comment: "Changed my mind.".to_string(),
        };
        let err = repo.add_review(1, &review).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // Aggregates unchanged by the rejected write.
        let detail = repo.get_product_by_slug("oak-armchair").await.unwrap().unwrap();
        assert_eq!(detail.card.review_count, 2);
    }

    #[tokio::test]
    async fn vocabulary_lists_active_names() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(&dir).await;

        assert_eq!(repo.category_names().await.unwrap(), vec!["Chairs", "Tables"]);
        assert_eq!(repo.color_names().await.unwrap(), vec!["Red", "Walnut"]);
        assert_eq!(repo.list_categories().await.unwrap().len(), 2);
    }
}
