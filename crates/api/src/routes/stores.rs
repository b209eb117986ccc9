//! Store API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Router, routing::get};

use stockroom_core::{LOW_STOCK_THRESHOLD, StoreId};

use crate::db::StoreRepository;
use crate::error::{ApiError, Json};
use crate::models::store::{
    CreateStoreRequest, Store, StoreSummary, StoreWithProducts, UpdateStoreRequest,
};
use crate::state::AppState;

/// Build the stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/summaries", get(store_summaries))
        .route(
            "/{id}",
            get(get_store).put(update_store).delete(delete_store),
        )
}

/// List all stores, name-ascending.
async fn list_stores(State(state): State<AppState>) -> Result<Json<Vec<Store>>, ApiError> {
    let stores = StoreRepository::new(state.pool()).list().await?;
    Ok(Json(stores))
}

/// Per-store aggregate report.
async fn store_summaries(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoreSummary>>, ApiError> {
    let summaries = StoreRepository::new(state.pool())
        .summaries(LOW_STOCK_THRESHOLD)
        .await?;
    Ok(Json(summaries))
}

/// Get a store together with its products.
async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoreWithProducts>, ApiError> {
    let store = StoreRepository::new(state.pool())
        .get_with_products(&StoreId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;
    Ok(Json(store))
}

/// Create a store.
async fn create_store(
    State(state): State<AppState>,
    Json(body): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<Store>), ApiError> {
    let input = body.validate().map_err(ApiError::validation)?;
    let store = StoreRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// Apply a partial update to a store.
async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStoreRequest>,
) -> Result<Json<Store>, ApiError> {
    let patch = body.validate().map_err(ApiError::validation)?;
    let store = StoreRepository::new(state.pool())
        .update(&StoreId::new(id), &patch)
        .await
        .map_err(|e| ApiError::from_repo(e, "Store not found"))?;
    Ok(Json(store))
}

/// Delete a store; its products are deleted with it.
async fn delete_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    StoreRepository::new(state.pool())
        .delete(&StoreId::new(id))
        .await
        .map_err(|e| ApiError::from_repo(e, "Store not found"))?;
    Ok(StatusCode::NO_CONTENT)
}
