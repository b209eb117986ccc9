//! Product domain models, list-query parsing, and request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use stockroom_core::{Category, ProductId, StoreId};

use super::store::Store;
use super::validation::{FieldErrors, coerce_integer, coerce_number, nonempty_string};

/// Default page size for product listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;
/// Maximum page size for product listings.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A product belonging to a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning store.
    pub store_id: StoreId,
    /// Product name.
    pub name: String,
    /// Category, stored lower-cased.
    pub category: Category,
    /// Unit price; always positive.
    pub price: f64,
    /// Units in stock; never negative.
    pub quantity_in_stock: i64,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Minimal store reference embedded in product listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreRef {
    pub id: StoreId,
    pub name: String,
}

/// A product with the minimal `{id, name}` store reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStoreRef {
    #[serde(flatten)]
    pub product: Product,
    pub store: StoreRef,
}

/// A product with its full store object (detail view).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStore {
    #[serde(flatten)]
    pub product: Product,
    pub store: Store,
}

/// One page of filtered products plus the total match count.
///
/// `total` counts every row matching the filter, independent of the
/// pagination window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub data: Vec<ProductWithStoreRef>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Parsed filter predicate for product listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub store_id: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub low_stock: bool,
}

/// Raw query string for `GET /api/products`.
///
/// Every field arrives as an optional string and is parsed leniently:
/// garbage numerics fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQuery {
    pub store_id: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub low_stock: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ProductQuery {
    /// Requested page, defaulting to 1; values below 1 or unparseable
    /// values also yield 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map_or(1, |p| p.max(1))
    }

    /// Requested page size, defaulting to 10 and clamped to `[1, 100]`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map_or(DEFAULT_PAGE_LIMIT, |l| l.clamp(1, MAX_PAGE_LIMIT))
    }

    /// Parse the filter predicate.
    ///
    /// Empty `storeId`/`category` values are ignored; the category is
    /// lower-cased so filtering matches the normalized stored form; price
    /// bounds apply only when they parse as finite numbers; `lowStock`
    /// applies only when the raw value is exactly `"true"`.
    #[must_use]
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            store_id: self
                .store_id
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
            category: self
                .category
                .as_deref()
                .and_then(|c| Category::parse(c).ok())
                .map(Category::into_inner),
            min_price: parse_finite(self.min_price.as_deref()),
            max_price: parse_finite(self.max_price.as_deref()),
            low_stock: self.low_stock.as_deref() == Some("true"),
        }
    }
}

fn parse_finite(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Validated input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_id: StoreId,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub quantity_in_stock: i64,
}

/// Validated partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub store_id: Option<StoreId>,
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub quantity_in_stock: Option<i64>,
}

/// Raw create-product request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub store_id: Option<Value>,
    pub name: Option<Value>,
    pub category: Option<Value>,
    pub price: Option<Value>,
    pub quantity_in_stock: Option<Value>,
}

impl CreateProductRequest {
    /// Validate the request into a [`NewProduct`].
    ///
    /// # Errors
    ///
    /// Returns a [`FieldErrors`] map with one entry per invalid field.
    pub fn validate(&self) -> Result<NewProduct, FieldErrors> {
        let mut errors = FieldErrors::new();

        let store_id = self.store_id.as_ref().and_then(nonempty_string);
        if store_id.is_none() {
            errors.add("storeId", "Store ID is required");
        }

        let name = self.name.as_ref().and_then(nonempty_string);
        if name.is_none() {
            errors.add("name", "Name is required");
        }

        let category = self
            .category
            .as_ref()
            .and_then(nonempty_string)
            .and_then(|c| Category::parse(&c).ok());
        if category.is_none() {
            errors.add("category", "Category is required");
        }

        let price = self
            .price
            .as_ref()
            .and_then(coerce_number)
            .filter(|p| *p > 0.0);
        if price.is_none() {
            errors.add("price", "Price must be positive");
        }

        let quantity = self
            .quantity_in_stock
            .as_ref()
            .and_then(coerce_integer)
            .filter(|q| *q >= 0);
        if quantity.is_none() {
            errors.add("quantityInStock", "Quantity must be non-negative");
        }

        match (store_id, name, category, price, quantity) {
            (Some(store_id), Some(name), Some(category), Some(price), Some(quantity))
                if errors.is_empty() =>
            {
                Ok(NewProduct {
                    store_id: StoreId::from(store_id),
                    name,
                    category,
                    price,
                    quantity_in_stock: quantity,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Raw update-product request body; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub store_id: Option<Value>,
    pub name: Option<Value>,
    pub category: Option<Value>,
    pub price: Option<Value>,
    pub quantity_in_stock: Option<Value>,
}

impl UpdateProductRequest {
    /// Validate the request into a [`ProductPatch`].
    ///
    /// The category is re-normalized when supplied.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldErrors`] map when a supplied field is invalid.
    pub fn validate(&self) -> Result<ProductPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut patch = ProductPatch::default();

        if let Some(value) = self.store_id.as_ref() {
            match nonempty_string(value) {
                Some(store_id) => patch.store_id = Some(StoreId::from(store_id)),
                None => errors.add("storeId", "Store ID is required"),
            }
        }

        if let Some(value) = self.name.as_ref() {
            match nonempty_string(value) {
                Some(name) => patch.name = Some(name),
                None => errors.add("name", "Name is required"),
            }
        }

        if let Some(value) = self.category.as_ref() {
            match nonempty_string(value).and_then(|c| Category::parse(&c).ok()) {
                Some(category) => patch.category = Some(category),
                None => errors.add("category", "Category is required"),
            }
        }

        if let Some(value) = self.price.as_ref() {
            match coerce_number(value).filter(|p| *p > 0.0) {
                Some(price) => patch.price = Some(price),
                None => errors.add("price", "Price must be positive"),
            }
        }

        if let Some(value) = self.quantity_in_stock.as_ref() {
            match coerce_integer(value).filter(|q| *q >= 0) {
                Some(quantity) => patch.quantity_in_stock = Some(quantity),
                None => errors.add("quantityInStock", "Quantity must be non-negative"),
            }
        }

        if errors.is_empty() { Ok(patch) } else { Err(errors) }
    }
}
