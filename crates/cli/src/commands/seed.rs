//! Database seeding command.
//!
//! Clears existing data and inserts 3 stores with 5 products each, spread
//! across 5 categories:
//!
//! ```bash
//! sr-cli seed
//! ```
//!
//! Prices and quantities are derived from the product index so repeated runs
//! produce identical data.

use stockroom_api::config::ApiConfig;
use stockroom_api::db::{self, ProductRepository, StoreRepository};
use stockroom_api::models::product::NewProduct;
use stockroom_api::models::store::NewStore;
use stockroom_core::Category;

const STORE_NAMES: [&str; 3] = ["Downtown Grocers", "Tech Haven", "Green Market"];

const CATEGORIES: [&str; 5] = ["electronics", "produce", "dairy", "beverages", "snacks"];

const PRODUCT_NAMES: [&str; 14] = [
    "Organic Milk",
    "Wireless Mouse",
    "Tomatoes",
    "Sparkling Water",
    "Chips",
    "Keyboard",
    "Apples",
    "Yogurt",
    "Headphones",
    "Bananas",
    "Soda",
    "USB Cable",
    "Lettuce",
    "Cheese",
];

const PRODUCTS_PER_STORE: usize = 5;

/// Seed the database with sample data.
///
/// # Errors
///
/// Returns an error if configuration is missing or a database call fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    // Products first: no cascade surprises if stores are re-seeded
    sqlx::query("DELETE FROM products").execute(&pool).await?;
    sqlx::query("DELETE FROM stores").execute(&pool).await?;

    let store_repo = StoreRepository::new(&pool);
    let product_repo = ProductRepository::new(&pool);

    let mut i: usize = 0;
    for store_name in STORE_NAMES {
        let store = store_repo
            .create(&NewStore {
                name: store_name.to_string(),
            })
            .await?;

        for j in 0..PRODUCTS_PER_STORE {
            let name = PRODUCT_NAMES
                .get(i % PRODUCT_NAMES.len())
                .copied()
                .unwrap_or("Product");
            let category = CATEGORIES.get(j % CATEGORIES.len()).copied().unwrap_or("misc");

            product_repo
                .create(&NewProduct {
                    store_id: store.id.clone(),
                    name: format!("{name} ({store_name})"),
                    category: Category::parse(category)?,
                    price: seed_price(i),
                    quantity_in_stock: seed_quantity(i),
                })
                .await?;
            i += 1;
        }
    }

    tracing::info!("Seed complete: 3 stores, 15 products.");
    Ok(())
}

/// Deterministic price in [5, 100), two decimals.
#[allow(clippy::cast_precision_loss)]
fn seed_price(i: usize) -> f64 {
    let cents = 500 + (i * 1_357) % 9_500;
    cents as f64 / 100.0
}

/// Deterministic quantity in [1, 50].
fn seed_quantity(i: usize) -> i64 {
    i64::try_from((i * 17) % 50).unwrap_or(0) + 1
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_price_in_range() {
        for i in 0..15 {
            let price = seed_price(i);
            assert!(price >= 5.0 && price < 100.0, "price {price} out of range");
        }
    }

    #[test]
    fn test_seed_quantity_in_range() {
        for i in 0..15 {
            let qty = seed_quantity(i);
            assert!((1..=50).contains(&qty), "quantity {qty} out of range");
        }
    }
}
