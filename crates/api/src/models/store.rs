//! Store domain models and request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use stockroom_core::StoreId;

use super::product::Product;
use super::validation::{FieldErrors, nonempty_string};

/// A store that owns products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
}

/// A store together with all of its products.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreWithProducts {
    #[serde(flatten)]
    pub store: Store,
    /// Products owned by this store, name-ascending.
    pub products: Vec<Product>,
}

/// Per-store aggregate report row.
///
/// Stores with zero products appear with zeroed aggregates;
/// `total_inventory_value` is rounded to 2 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub store_id: StoreId,
    pub store_name: String,
    pub product_count: i64,
    pub total_inventory_value: f64,
    pub low_stock_count: i64,
}

/// Validated input for creating a store.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
}

/// Validated partial update for a store; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct StorePatch {
    pub name: Option<String>,
}

/// Raw create-store request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: Option<Value>,
}

impl CreateStoreRequest {
    /// Validate the request into a [`NewStore`].
    ///
    /// # Errors
    ///
    /// Returns a [`FieldErrors`] map with one entry per invalid field.
    pub fn validate(&self) -> Result<NewStore, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.as_ref().and_then(nonempty_string);
        if name.is_none() {
            errors.add("name", "Name is required");
        }

        match name {
            Some(name) if errors.is_empty() => Ok(NewStore { name }),
            _ => Err(errors),
        }
    }
}

/// Raw update-store request body; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    pub name: Option<Value>,
}

impl UpdateStoreRequest {
    /// Validate the request into a [`StorePatch`].
    ///
    /// # Errors
    ///
    /// Returns a [`FieldErrors`] map when a supplied field is invalid.
    pub fn validate(&self) -> Result<StorePatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut patch = StorePatch::default();

        if let Some(value) = self.name.as_ref() {
            match nonempty_string(value) {
                Some(name) => patch.name = Some(name),
                None => errors.add("name", "Name is required"),
            }
        }

        if errors.is_empty() { Ok(patch) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_store_valid() {
        let req: CreateStoreRequest = serde_json::from_value(json!({ "name": "Green Market" })).unwrap();
        let store = req.validate().unwrap();
        assert_eq!(store.name, "Green Market");
    }

    #[test]
    fn test_create_store_missing_name() {
        let req: CreateStoreRequest = serde_json::from_value(json!({})).unwrap();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["Name is required"]);
    }

    #[test]
    fn test_create_store_empty_name() {
        let req: CreateStoreRequest = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_store_non_string_name() {
        let req: CreateStoreRequest = serde_json::from_value(json!({ "name": 42 })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_store_absent_name_is_noop_patch() {
        let req: UpdateStoreRequest = serde_json::from_value(json!({})).unwrap();
        let patch = req.validate().unwrap();
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_update_store_empty_name_rejected() {
        let req: UpdateStoreRequest = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_store_serializes_camel_case() {
        let store = Store {
            id: StoreId::from("s1"),
            name: "Tech Haven".to_string(),
            created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["id"], "s1");
        assert_eq!(json["name"], "Tech Haven");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
