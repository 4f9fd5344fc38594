//! Catalog entities: categories, colors, products, and their API shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A furniture category (Chairs, Tables, Sofas, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A color a product can be ordered in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    pub id: i64,
    pub name: String,
    pub hex_code: String,
}

/// A catalog product row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub category_id: i64,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub sku: String,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Sale price when set, regular price otherwise.
    pub fn effective_price(&self) -> f64 {
        self.sale_price.unwrap_or(self.price)
    }

    /// Rounded percentage off when the sale price undercuts the list price.
    pub fn discount_percentage(&self) -> u32 {
        match self.sale_price {
            Some(sale) if sale < self.price && self.price > 0.0 => {
                (((self.price - sale) / self.price) * 100.0).round() as u32
            }
            _ => 0,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

/// A customer review attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReview {
    pub id: i64,
    pub product_id: i64,
    pub reviewer_name: String,
    pub rating: i64,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A review submission before it gets an id and timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub reviewer_name: String,
    pub rating: i64,
    pub title: String,
    pub comment: String,
}

/// The product card shape returned by list, search, and assistant endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    pub effective_price: f64,
    pub discount_percentage: u32,
    pub category: String,
    pub is_featured: bool,
    pub is_on_sale: bool,
    pub is_in_stock: bool,
    /// Mean approved-review rating rounded to one decimal, `null` when
    /// the product has no approved reviews.
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub colors: Vec<String>,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
}

impl ProductCard {
    /// Build a card from a product row plus the joins the row cannot carry.
    pub fn from_product(
        product: &Product,
        category: String,
        colors: Vec<String>,
        main_image: Option<String>,
    ) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: product.price,
            sale_price: product.sale_price,
            effective_price: product.effective_price(),
            discount_percentage: product.discount_percentage(),
            category,
            is_featured: product.is_featured,
            is_on_sale: product.is_on_sale,
            is_in_stock: product.is_in_stock(),
            average_rating: None,
            review_count: 0,
            colors,
            short_description: product.short_description.clone(),
            main_image,
        }
    }

    /// Attach the review aggregates computed alongside the product row.
    pub fn with_review_stats(mut self, average_rating: Option<f64>, review_count: i64) -> Self {
        self.average_rating = average_rating;
        self.review_count = review_count;
        self
    }
}

/// Full product detail for the single-product endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub card: ProductCard,
    pub description: String,
    pub sku: String,
    pub stock_quantity: i64,
    pub images: Vec<String>,
    /// Approved reviews, newest first.
    pub reviews: Vec<ProductReview>,
}
