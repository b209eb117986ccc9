//! Product API handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Router, routing::get};
use serde::Deserialize;

use stockroom_core::{LOW_STOCK_THRESHOLD, ProductId};

use crate::db::{ProductRepository, StoreRepository};
use crate::error::{ApiError, Json};
use crate::models::product::{
    CreateProductRequest, ProductPage, ProductQuery, ProductWithStore, ProductWithStoreRef,
    UpdateProductRequest,
};
use crate::models::validation::FieldErrors;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/categories", get(list_categories))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List one page of products matching the query filters.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductPage>, ApiError> {
    let page = ProductRepository::new(state.pool())
        .list(
            &query.filter(),
            query.page(),
            query.limit(),
            LOW_STOCK_THRESHOLD,
        )
        .await?;
    Ok(Json(page))
}

/// Query string for `GET /api/products/categories`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CategoriesQuery {
    store_id: Option<String>,
}

/// Distinct categories, ascending, optionally scoped to one store.
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let store_id = query.store_id.as_deref().filter(|s| !s.is_empty());
    let categories = ProductRepository::new(state.pool())
        .categories(store_id)
        .await?;
    Ok(Json(categories))
}

/// Get a product with its full store object.
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductWithStore>, ApiError> {
    let product = ProductRepository::new(state.pool())
        .get_with_store(&ProductId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

/// Create a product. The owning store must exist; a bad `storeId` is a
/// validation failure, checked before any insert.
async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductWithStoreRef>), ApiError> {
    let input = body.validate().map_err(ApiError::validation)?;

    if !StoreRepository::new(state.pool()).exists(&input.store_id).await? {
        let mut errors = FieldErrors::new();
        errors.add("storeId", "Store does not exist");
        return Err(ApiError::validation(errors));
    }

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product.
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductWithStoreRef>, ApiError> {
    let patch = body.validate().map_err(ApiError::validation)?;

    if let Some(store_id) = patch.store_id.as_ref()
        && !StoreRepository::new(state.pool()).exists(store_id).await?
    {
        let mut errors = FieldErrors::new();
        errors.add("storeId", "Store does not exist");
        return Err(ApiError::validation(errors));
    }

    let product = ProductRepository::new(state.pool())
        .update(&ProductId::new(id), &patch)
        .await
        .map_err(|e| ApiError::from_repo(e, "Product not found"))?;
    Ok(Json(product))
}

/// Delete a product.
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ProductRepository::new(state.pool())
        .delete(&ProductId::new(id))
        .await
        .map_err(|e| ApiError::from_repo(e, "Product not found"))?;
    Ok(StatusCode::NO_CONTENT)
}
