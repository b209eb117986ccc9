//! Database operations for products: filtered/paginated listings, distinct
//! categories, and CRUD.
//!
//! The list filter predicate is shared between the data query and the count
//! query so `total` always counts the same rows the window is drawn from.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use stockroom_core::{Category, ProductId, StoreId};

use super::RepositoryError;
use crate::models::product::{
    NewProduct, Product, ProductFilter, ProductPage, ProductPatch, ProductWithStore,
    ProductWithStoreRef, StoreRef,
};
use crate::models::store::Store;

/// Filter predicate over `products p`; binds 1-6 are storeId, category,
/// minPrice, maxPrice, lowStock flag, and the low-stock threshold.
const FILTER_WHERE: &str = "(?1 IS NULL OR p.store_id = ?1)
    AND (?2 IS NULL OR p.category = ?2)
    AND (?3 IS NULL OR p.price >= ?3)
    AND (?4 IS NULL OR p.price <= ?4)
    AND (NOT ?5 OR p.quantity_in_stock < ?6)";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for plain product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    store_id: String,
    name: String,
    category: Category,
    price: f64,
    quantity_in_stock: i64,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            store_id: StoreId::new(row.store_id),
            name: row.name,
            category: row.category,
            price: row.price,
            quantity_in_stock: row.quantity_in_stock,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for products joined with the minimal store reference.
#[derive(Debug, sqlx::FromRow)]
struct ProductWithStoreNameRow {
    id: String,
    store_id: String,
    name: String,
    category: Category,
    price: f64,
    quantity_in_stock: i64,
    created_at: DateTime<Utc>,
    store_name: String,
}

impl From<ProductWithStoreNameRow> for ProductWithStoreRef {
    fn from(row: ProductWithStoreNameRow) -> Self {
        let store = StoreRef {
            id: StoreId::new(row.store_id.clone()),
            name: row.store_name,
        };
        Self {
            product: Product {
                id: ProductId::new(row.id),
                store_id: StoreId::new(row.store_id),
                name: row.name,
                category: row.category,
                price: row.price,
                quantity_in_stock: row.quantity_in_stock,
                created_at: row.created_at,
            },
            store,
        }
    }
}

/// Internal row type for a product joined with its full store.
#[derive(Debug, sqlx::FromRow)]
struct ProductWithStoreRow {
    id: String,
    store_id: String,
    name: String,
    category: Category,
    price: f64,
    quantity_in_stock: i64,
    created_at: DateTime<Utc>,
    store_name: String,
    store_created_at: DateTime<Utc>,
}

impl From<ProductWithStoreRow> for ProductWithStore {
    fn from(row: ProductWithStoreRow) -> Self {
        let store = Store {
            id: StoreId::new(row.store_id.clone()),
            name: row.store_name,
            created_at: row.store_created_at,
        };
        Self {
            product: Product {
                id: ProductId::new(row.id),
                store_id: StoreId::new(row.store_id),
                name: row.name,
                category: row.category,
                price: row.price,
                quantity_in_stock: row.quantity_in_stock,
                created_at: row.created_at,
            },
            store,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List one page of products matching the filter, plus the total count
    /// of all matching rows.
    ///
    /// Ordering is `name ASC, id ASC` - the id tiebreak keeps pagination
    /// deterministic when names collide. `page` is 1-based; the window is
    /// `OFFSET (page-1)*limit LIMIT limit`, saturating so an absurd page
    /// yields an empty window instead of overflowing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: i64,
        limit: i64,
        low_stock_threshold: i64,
    ) -> Result<ProductPage, RepositoryError> {
        // page >= 1 is the caller's contract, so the subtraction can't wrap
        let offset = (page - 1).saturating_mul(limit);

        let data_sql = format!(
            "SELECT p.id, p.store_id, p.name, p.category, p.price, p.quantity_in_stock,
                    p.created_at, s.name AS store_name
             FROM products p
             INNER JOIN stores s ON s.id = p.store_id
             WHERE {FILTER_WHERE}
             ORDER BY p.name ASC, p.id ASC
             LIMIT ?7 OFFSET ?8"
        );
        let rows: Vec<ProductWithStoreNameRow> = sqlx::query_as(&data_sql)
            .bind(filter.store_id.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(filter.low_stock)
            .bind(low_stock_threshold)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM products p WHERE {FILTER_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.store_id.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(filter.low_stock)
            .bind(low_stock_threshold)
            .fetch_one(self.pool)
            .await?;

        Ok(ProductPage {
            data: rows.into_iter().map(Into::into).collect(),
            total,
            page,
            limit,
        })
    }

    /// All products of one store, name-ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(&self, store_id: &StoreId) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, store_id, name, category, price, quantity_in_stock, created_at
             FROM products
             WHERE store_id = ?1
             ORDER BY name ASC, id ASC",
        )
        .bind(store_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Distinct categories, ascending, optionally scoped to one store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(
        &self,
        store_id: Option<&str>,
    ) -> Result<Vec<String>, RepositoryError> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM products
             WHERE (?1 IS NULL OR store_id = ?1)
             ORDER BY category ASC",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a product with its full store object.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_store(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductWithStore>, RepositoryError> {
        let row: Option<ProductWithStoreRow> = sqlx::query_as(
            "SELECT p.id, p.store_id, p.name, p.category, p.price, p.quantity_in_stock,
                    p.created_at, s.name AS store_name, s.created_at AS store_created_at
             FROM products p
             INNER JOIN stores s ON s.id = p.store_id
             WHERE p.id = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new product. The caller verifies the store exists first so a
    /// bad `storeId` surfaces as a validation error, not a constraint blowup.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn create(
        &self,
        input: &NewProduct,
    ) -> Result<ProductWithStoreRef, RepositoryError> {
        let id = ProductId::generate();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO products (id, store_id, name, category, price, quantity_in_stock, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(id.as_str())
        .bind(input.store_id.as_str())
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.quantity_in_stock)
        .bind(created_at)
        .execute(self.pool)
        .await?;

        self.get_with_store_ref(&id).await
    }

    /// Apply a partial update to a product; the category arrives
    /// re-normalized from validation when supplied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<ProductWithStoreRef, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET
                store_id = COALESCE(?2, store_id),
                name = COALESCE(?3, name),
                category = COALESCE(?4, category),
                price = COALESCE(?5, price),
                quantity_in_stock = COALESCE(?6, quantity_in_stock)
             WHERE id = ?1",
        )
        .bind(id.as_str())
        .bind(patch.store_id.as_ref().map(StoreId::as_str))
        .bind(patch.name.as_deref())
        .bind(patch.category.as_ref())
        .bind(patch.price)
        .bind(patch.quantity_in_stock)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_with_store_ref(id).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Fetch one product joined with the minimal store reference.
    async fn get_with_store_ref(
        &self,
        id: &ProductId,
    ) -> Result<ProductWithStoreRef, RepositoryError> {
        let row: ProductWithStoreNameRow = sqlx::query_as(
            "SELECT p.id, p.store_id, p.name, p.category, p.price, p.quantity_in_stock,
                    p.created_at, s.name AS store_name
             FROM products p
             INNER JOIN stores s ON s.id = p.store_id
             WHERE p.id = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::store::NewStore;

    async fn seed_store(pool: &SqlitePool, name: &str) -> Store {
        crate::db::StoreRepository::new(pool)
            .create(&NewStore {
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_product(
        pool: &SqlitePool,
        store_id: &StoreId,
        name: &str,
        category: &str,
        price: f64,
        qty: i64,
    ) -> ProductWithStoreRef {
        ProductRepository::new(pool)
            .create(&NewProduct {
                store_id: store_id.clone(),
                name: name.to_string(),
                category: category.parse().unwrap(),
                price,
                quantity_in_stock: qty,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_paginates_and_counts_all_matches() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        for name in ["Apples", "Bananas", "Cheese", "Dates", "Eggs"] {
            seed_product(&pool, &store.id, name, "produce", 2.0, 10).await;
        }

        let repo = ProductRepository::new(&pool);
        let filter = ProductFilter::default();

        let page1 = repo.list(&filter, 1, 2, 5).await.unwrap();
        assert_eq!(page1.total, 5);
        assert_eq!(page1.data.len(), 2);
        assert_eq!(page1.data.first().unwrap().product.name, "Apples");

        let page2 = repo.list(&filter, 2, 2, 5).await.unwrap();
        assert_eq!(page2.total, 5, "total is invariant across pages");
        assert_eq!(page2.data.first().unwrap().product.name, "Cheese");

        let page3 = repo.list(&filter, 3, 2, 5).await.unwrap();
        assert_eq!(page3.data.len(), 1);

        let beyond = repo.list(&filter, 4, 2, 5).await.unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[tokio::test]
    async fn test_list_maximum_page_saturates_to_empty_window() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        seed_product(&pool, &store.id, "Widget", "misc", 1.0, 10).await;

        let page = ProductRepository::new(&pool)
            .list(&ProductFilter::default(), i64::MAX, 100, 5)
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_store_and_category() {
        let pool = test_pool().await;
        let a = seed_store(&pool, "A").await;
        let b = seed_store(&pool, "B").await;
        seed_product(&pool, &a.id, "Milk", "dairy", 3.0, 10).await;
        seed_product(&pool, &a.id, "Chips", "snacks", 2.0, 10).await;
        seed_product(&pool, &b.id, "Yogurt", "dairy", 4.0, 10).await;

        let repo = ProductRepository::new(&pool);

        let dairy = repo
            .list(
                &ProductFilter {
                    category: Some("dairy".to_string()),
                    ..Default::default()
                },
                1,
                10,
                5,
            )
            .await
            .unwrap();
        assert_eq!(dairy.total, 2);

        let store_a_dairy = repo
            .list(
                &ProductFilter {
                    store_id: Some(a.id.as_str().to_string()),
                    category: Some("dairy".to_string()),
                    ..Default::default()
                },
                1,
                10,
                5,
            )
            .await
            .unwrap();
        assert_eq!(store_a_dairy.total, 1);
        assert_eq!(store_a_dairy.data.first().unwrap().product.name, "Milk");
    }

    #[tokio::test]
    async fn test_category_filter_matches_normalized_writes() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        // Written as "Produce"; normalization stores "produce"
        seed_product(&pool, &store.id, "Tomatoes", "Produce", 2.0, 10).await;

        let repo = ProductRepository::new(&pool);
        let result = repo
            .list(
                &ProductFilter {
                    category: Some("produce".to_string()),
                    ..Default::default()
                },
                1,
                10,
                5,
            )
            .await
            .unwrap();

        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn test_price_range_bounds_are_inclusive() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        seed_product(&pool, &store.id, "Cheap", "misc", 5.0, 10).await;
        seed_product(&pool, &store.id, "Mid", "misc", 10.0, 10).await;
        seed_product(&pool, &store.id, "Dear", "misc", 20.0, 10).await;

        let repo = ProductRepository::new(&pool);
        let result = repo
            .list(
                &ProductFilter {
                    min_price: Some(5.0),
                    max_price: Some(10.0),
                    ..Default::default()
                },
                1,
                10,
                5,
            )
            .await
            .unwrap();

        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn test_low_stock_excludes_exact_threshold() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        seed_product(&pool, &store.id, "Scarce", "misc", 1.0, 4).await;
        seed_product(&pool, &store.id, "Boundary", "misc", 1.0, 5).await;
        seed_product(&pool, &store.id, "Plenty", "misc", 1.0, 6).await;

        let repo = ProductRepository::new(&pool);
        let result = repo
            .list(
                &ProductFilter {
                    low_stock: true,
                    ..Default::default()
                },
                1,
                10,
                5,
            )
            .await
            .unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.data.first().unwrap().product.name, "Scarce");
    }

    #[tokio::test]
    async fn test_categories_distinct_sorted_and_scoped() {
        let pool = test_pool().await;
        let a = seed_store(&pool, "A").await;
        let b = seed_store(&pool, "B").await;
        seed_product(&pool, &a.id, "Milk", "dairy", 3.0, 10).await;
        seed_product(&pool, &a.id, "Cheese", "dairy", 6.0, 10).await;
        seed_product(&pool, &a.id, "Chips", "snacks", 2.0, 10).await;
        seed_product(&pool, &b.id, "Soda", "beverages", 1.5, 10).await;

        let repo = ProductRepository::new(&pool);

        let all = repo.categories(None).await.unwrap();
        assert_eq!(all, ["beverages", "dairy", "snacks"]);

        let scoped = repo.categories(Some(a.id.as_str())).await.unwrap();
        assert_eq!(scoped, ["dairy", "snacks"]);
    }

    #[tokio::test]
    async fn test_get_with_store_embeds_full_store() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        let created = seed_product(&pool, &store.id, "Widget", "tools", 9.99, 3).await;

        let found = ProductRepository::new(&pool)
            .get_with_store(&created.product.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.store.id, store.id);
        assert_eq!(found.store.name, "Mart");
        assert_eq!(found.store.created_at, store.created_at);
    }

    #[tokio::test]
    async fn test_update_touches_only_supplied_fields() {
        let pool = test_pool().await;
        let store = seed_store(&pool, "Mart").await;
        let created = seed_product(&pool, &store.id, "Widget", "tools", 9.99, 3).await;

        let updated = ProductRepository::new(&pool)
            .update(
                &created.product.id,
                &ProductPatch {
                    quantity_in_stock: Some(10),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.product.quantity_in_stock, 10);
        assert_eq!(updated.product.name, "Widget");
        assert!((updated.product.price - 9.99).abs() < f64::EPSILON);
        assert_eq!(updated.product.category.as_str(), "tools");
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let pool = test_pool().await;
        let err = ProductRepository::new(&pool)
            .update(&ProductId::from("nope"), &ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let pool = test_pool().await;
        let err = ProductRepository::new(&pool)
            .delete(&ProductId::from("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
