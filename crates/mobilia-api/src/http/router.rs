//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`. Middleware: CORS, tracing, and a body
//! limit sized to the configured image upload ceiling.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Multipart framing overhead on top of the image itself.
    let body_limit = state.config.search.max_upload_bytes + 64 * 1024;

    let api_routes = Router::new()
        // Assistant
        .route("/assistant/chat", post(handlers::assistant::chat))
        .route(
            "/assistant/history",
            get(handlers::assistant::get_history).delete(handlers::assistant::clear_history),
        )
        // Image similarity search
        .route("/search/image", post(handlers::search::image_search))
        .route(
            "/admin/refresh-features",
            post(handlers::search::refresh_features),
        )
        // Catalog browsing
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/{slug}", get(handlers::catalog::get_product))
        .route(
            "/products/{slug}/reviews",
            post(handlers::catalog::add_review),
        )
        .route("/categories", get(handlers::catalog::list_categories))
        .route(
            "/categories/{slug}/products",
            get(handlers::catalog::category_products),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
