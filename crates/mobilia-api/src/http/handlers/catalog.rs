//! Catalog browsing endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use mobilia_core::catalog::{CatalogRepository, ReviewRepository};
use mobilia_types::catalog::NewReview;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// Category slug to narrow by.
    pub category: Option<String>,
    /// Substring match on product name or short description.
    pub search: Option<String>,
}

/// GET /api/products — list active products.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let products = state
        .catalog
        .list_products(params.category.as_deref(), params.search.as_deref())
        .await?;
    Ok(Json(json!({
        "count": products.len(),
        "products": products,
    })))
}

/// GET /api/products/{slug} — full product detail.
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let detail = state
        .catalog
        .get_product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no product with slug '{slug}'")))?;
    Ok(Json(json!({ "product": detail })))
}

/// GET /api/categories — all active categories.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(json!({
        "count": categories.len(),
        "categories": categories,
    })))
}

/// GET /api/categories/{slug}/products — a category's active products.
pub async fn category_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let category = state
        .catalog
        .list_categories()
        .await?
        .into_iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| AppError::NotFound(format!("no category with slug '{slug}'")))?;

    let products = state.catalog.list_products(Some(&slug), None).await?;
    Ok(Json(json!({
        "category": category,
        "count": products.len(),
        "products": products,
    })))
}

/// Request body for submitting a product review.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub reviewer_name: String,
    pub rating: i64,
    #[serde(default)]
    pub title: String,
    pub comment: String,
}

fn validate_review(body: &ReviewRequest) -> Result<(), AppError> {
    if body.reviewer_name.trim().is_empty() {
        return Err(AppError::Validation("reviewer_name must not be empty".to_string()));
    }
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::Validation("rating must be between 1 and 5".to_string()));
    }
    if body.comment.trim().is_empty() {
        return Err(AppError::Validation("comment must not be empty".to_string()));
    }
    Ok(())
}

/// POST /api/products/{slug}/reviews — submit a review for a product.
///
/// One review per reviewer per product; a repeat submission is a 400.
pub async fn add_review(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate_review(&body)?;

    let detail = state
        .catalog
        .get_product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no product with slug '{slug}'")))?;

    let review = NewReview {
        reviewer_name: body.reviewer_name.trim().to_string(),
        rating: body.rating,
        title: body.title,
        comment: body.comment,
    };
    let saved = state.catalog.add_review(detail.card.id, &review).await?;

    Ok((StatusCode::CREATED, Json(json!({ "review": saved }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(name: &str, rating: i64, comment: &str) -> ReviewRequest {
        ReviewRequest {
            reviewer_name: name.to_string(),
            rating,
            title: String::new(),
            comment: comment.to_string(),
        }
    }

    #[test]
    fn review_validation_accepts_full_rating_range() {
        for rating in 1..=5 {
            assert!(validate_review(&review("Mona", rating, "Nice.")).is_ok());
        }
    }

    #[test]
    fn review_validation_rejects_out_of_range_ratings() {
        assert!(validate_review(&review("Mona", 0, "Nice.")).is_err());
        assert!(validate_review(&review("Mona", 6, "Nice.")).is_err());
        assert!(validate_review(&review("Mona", -1, "Nice.")).is_err());
    }

    #[test]
    fn review_validation_requires_name_and_comment() {
        assert!(validate_review(&review("  ", 4, "Nice.")).is_err());
        assert!(validate_review(&review("Mona", 4, "")).is_err());
    }

    #[test]
    fn review_title_is_optional_in_the_body() {
        let body: ReviewRequest = serde_json::from_value(serde_json::json!({
            "reviewer_name": "Mona",
            "rating": 5,
            "comment": "Great chair.",
        }))
        .unwrap();
        assert_eq!(body.title, "");
    }
}
