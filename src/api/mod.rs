//! API module - Axum HTTP server and routes
//!
//! All JSON endpoints for the directory: firms, reviews, resources, auth.

mod handlers;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main application router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ==========================================
        // Health
        // ==========================================
        .route("/api/health", get(handlers::health_check))

        // ==========================================
        // Prop Firms
        // ==========================================
        .route("/api/firms", get(handlers::get_firms).post(handlers::create_firm))
        .route("/api/firms/featured", get(handlers::get_featured_firms))
        .route("/api/firms/compare", get(handlers::compare_firms))
        .route(
            "/api/firms/:id",
            get(handlers::get_firm)
                .put(handlers::update_firm)
                .delete(handlers::delete_firm),
        )
        .route("/api/firms/:id/reviews", get(handlers::get_firm_reviews))

        // ==========================================
        // Reviews
        // ==========================================
        .route("/api/reviews", get(handlers::get_reviews).post(handlers::create_review))

        // ==========================================
        // Resources
        // ==========================================
        .route("/api/resources", get(handlers::get_resources).post(handlers::create_resource))
        .route("/api/resources/category/:category", get(handlers::get_resources_by_category))
        .route(
            "/api/resources/:id",
            get(handlers::get_resource)
                .put(handlers::update_resource)
                .delete(handlers::delete_resource),
        )

        // ==========================================
        // Auth
        // ==========================================
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/admin/login", post(handlers::admin_login))

        // Apply middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
