//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//! GET    /health/ready             - DB readiness probe
//!
//! # Stores
//! GET    /api/stores               - List stores, name-ascending
//! GET    /api/stores/summaries     - Per-store aggregate report
//! GET    /api/stores/{id}          - Store + its products
//! POST   /api/stores               - Create store
//! PUT    /api/stores/{id}          - Partial update
//! DELETE /api/stores/{id}          - Delete (cascades products)
//!
//! # Products
//! GET    /api/products             - Filtered, paginated page
//! GET    /api/products/categories  - Distinct categories
//! GET    /api/products/{id}        - Product + full store
//! POST   /api/products             - Create product
//! PUT    /api/products/{id}        - Partial update
//! DELETE /api/products/{id}        - Delete
//! ```

pub mod products;
pub mod stores;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use serde_json::json;

use crate::error::Json;
use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/stores", stores::router())
        .nest("/api/products", products::router())
}

/// Liveness health check endpoint.
///
/// Returns `{ ok: true }` if the server is running. Does not check dependencies.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> Response {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
