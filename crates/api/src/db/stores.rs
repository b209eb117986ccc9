//! Database operations for stores.
//!
//! Queries use the runtime `sqlx::query(...).bind(...)` API with `FromRow`
//! row structs mapped into domain models.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use stockroom_core::StoreId;

use super::{RepositoryError, round_currency};
use crate::models::store::{NewStore, Store, StorePatch, StoreSummary, StoreWithProducts};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for the per-store aggregation report.
#[derive(Debug, sqlx::FromRow)]
struct StoreSummaryRow {
    store_id: String,
    store_name: String,
    product_count: i64,
    total_value: f64,
    low_stock_count: i64,
}

impl From<StoreSummaryRow> for StoreSummary {
    fn from(row: StoreSummaryRow) -> Self {
        Self {
            store_id: StoreId::new(row.store_id),
            store_name: row.store_name,
            product_count: row.product_count,
            total_inventory_value: round_currency(row.total_value),
            low_stock_count: row.low_stock_count,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all stores, name-ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = sqlx::query_as(
            "SELECT id, name, created_at FROM stores ORDER BY name ASC, id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a store together with its products, products name-ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_products(
        &self,
        id: &StoreId,
    ) -> Result<Option<StoreWithProducts>, RepositoryError> {
        let row: Option<StoreRow> =
            sqlx::query_as("SELECT id, name, created_at FROM stores WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let products = super::products::ProductRepository::new(self.pool)
            .list_for_store(id)
            .await?;

        Ok(Some(StoreWithProducts {
            store: row.into(),
            products,
        }))
    }

    /// Create a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewStore) -> Result<Store, RepositoryError> {
        let id = StoreId::generate();
        let created_at = Utc::now();

        sqlx::query("INSERT INTO stores (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(id.as_str())
            .bind(&input.name)
            .bind(created_at)
            .execute(self.pool)
            .await?;

        Ok(Store {
            id,
            name: input.name.clone(),
            created_at,
        })
    }

    /// Apply a partial update to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: &StoreId, patch: &StorePatch) -> Result<Store, RepositoryError> {
        let row: StoreRow = sqlx::query_as(
            "UPDATE stores SET name = COALESCE(?2, name)
             WHERE id = ?1
             RETURNING id, name, created_at",
        )
        .bind(id.as_str())
        .bind(patch.name.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a store; its products go with it via `ON DELETE CASCADE`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: &StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// True if a store with this ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: &StoreId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM stores WHERE id = ?1)")
            .bind(id.as_str())
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Per-store aggregate report: product count, total inventory value,
    /// and low-stock count, name-ascending.
    ///
    /// One grouped `LEFT JOIN` so stores with zero products still appear with
    /// zeroed aggregates. The low-stock threshold is bound as a parameter,
    /// never interpolated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summaries(
        &self,
        low_stock_threshold: i64,
    ) -> Result<Vec<StoreSummary>, RepositoryError> {
        let rows: Vec<StoreSummaryRow> = sqlx::query_as(
            "SELECT
                s.id AS store_id,
                s.name AS store_name,
                COUNT(p.id) AS product_count,
                COALESCE(SUM(p.price * p.quantity_in_stock), 0.0) AS total_value,
                COALESCE(SUM(CASE WHEN p.quantity_in_stock < ?1 THEN 1 ELSE 0 END), 0)
                    AS low_stock_count
             FROM stores s
             LEFT JOIN products p ON p.store_id = s.id
             GROUP BY s.id, s.name
             ORDER BY s.name ASC, s.id ASC",
        )
        .bind(low_stock_threshold)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::product::NewProduct;

    async fn seed_store(pool: &SqlitePool, name: &str) -> Store {
        StoreRepository::new(pool)
            .create(&NewStore {
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_product(pool: &SqlitePool, store_id: &StoreId, name: &str, price: f64, qty: i64) {
        crate::db::ProductRepository::new(pool)
            .create(&NewProduct {
                store_id: store_id.clone(),
                name: name.to_string(),
                category: "tools".parse().unwrap(),
                price,
                quantity_in_stock: qty,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let pool = test_pool().await;
        seed_store(&pool, "Tech Haven").await;
        seed_store(&pool, "Downtown Grocers").await;
        seed_store(&pool, "Green Market").await;

        let names: Vec<String> = StoreRepository::new(&pool)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, ["Downtown Grocers", "Green Market", "Tech Haven"]);
    }

    #[tokio::test]
    async fn test_get_with_products_returns_none_for_missing() {
        let pool = test_pool().await;
        let result = StoreRepository::new(&pool)
            .get_with_products(&StoreId::from("nope"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_store_is_not_found() {
        let pool = test_pool().await;
        let err = StoreRepository::new(&pool)
            .update(
                &StoreId::from("nope"),
                &StorePatch {
                    name: Some("X".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_without_fields_leaves_name_unchanged() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Original").await;

        let updated = StoreRepository::new(&pool)
            .update(&store.id, &StorePatch::default())
            .await
            .unwrap();

        assert_eq!(updated.name, "Original");
    }

    #[tokio::test]
    async fn test_delete_cascades_to_products() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Doomed").await;
        seed_product(&pool, &store.id, "Widget", 9.99, 3).await;

        StoreRepository::new(&pool).delete(&store.id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_store_is_not_found() {
        let pool = test_pool().await;
        let err = StoreRepository::new(&pool)
            .delete(&StoreId::from("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_summaries_zero_product_store_has_zeroed_aggregates() {
        let pool = test_pool().await;
        seed_store(&pool, "Empty Mart").await;

        let summaries = StoreRepository::new(&pool).summaries(5).await.unwrap();
        assert_eq!(summaries.len(), 1);

        let summary = summaries.first().unwrap();
        assert_eq!(summary.store_name, "Empty Mart");
        assert_eq!(summary.product_count, 0);
        assert!((summary.total_inventory_value - 0.0).abs() < f64::EPSILON);
        assert_eq!(summary.low_stock_count, 0);
    }

    #[tokio::test]
    async fn test_summaries_aggregates_and_rounds() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Busy Mart").await;
        // 3.335 * 3 = 10.005, rounds to 10.01
        seed_product(&pool, &store.id, "Widget", 3.335, 3).await;
        seed_product(&pool, &store.id, "Gadget", 10.0, 7).await;

        let summaries = StoreRepository::new(&pool).summaries(5).await.unwrap();
        let summary = summaries.first().unwrap();

        assert_eq!(summary.product_count, 2);
        assert!((summary.total_inventory_value - 80.01).abs() < 1e-9);
        assert_eq!(summary.low_stock_count, 1);
    }

    #[tokio::test]
    async fn test_summaries_threshold_is_a_parameter() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        seed_product(&pool, &store.id, "Widget", 1.0, 4).await;
        seed_product(&pool, &store.id, "Gadget", 1.0, 9).await;

        let at_five = StoreRepository::new(&pool).summaries(5).await.unwrap();
        assert_eq!(at_five.first().unwrap().low_stock_count, 1);

        let at_ten = StoreRepository::new(&pool).summaries(10).await.unwrap();
        assert_eq!(at_ten.first().unwrap().low_stock_count, 2);
    }

    #[tokio::test]
    async fn test_summaries_sorted_by_store_name() {
        let pool = test_pool().await;
        seed_store(&pool, "Zebra").await;
        seed_store(&pool, "Alpha").await;

        let names: Vec<String> = StoreRepository::new(&pool)
            .summaries(5)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.store_name)
            .collect();

        assert_eq!(names, ["Alpha", "Zebra"]);
    }
}
