//! Product category type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Category`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CategoryError {
    /// The input string is empty or whitespace-only.
    #[error("category cannot be empty")]
    Empty,
}

/// A product category.
///
/// Categories are normalized to lower-case on construction, so comparing or
/// filtering by category is case-insensitive by construction: `"Produce"` and
/// `"produce"` parse to the same value, and the normalized form is what gets
/// persisted.
///
/// ## Examples
///
/// ```
/// use stockroom_core::Category;
///
/// let a = Category::parse("Produce").unwrap();
/// let b = Category::parse("produce").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "produce");
///
/// assert!(Category::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Parse a `Category` from a string, normalizing to lower-case.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::Empty`] if the input is empty or contains
    /// only whitespace.
    pub fn parse(s: &str) -> Result<Self, CategoryError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Empty);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the normalized category as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Category` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with sqlite feature)
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Category {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Category {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        // Database values are stored normalized
        Ok(Self(s))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Category {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.0.clone(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases() {
        let c = Category::parse("Produce").unwrap();
        assert_eq!(c.as_str(), "produce");

        let c = Category::parse("ELECTRONICS").unwrap();
        assert_eq!(c.as_str(), "electronics");
    }

    #[test]
    fn test_parse_trims() {
        let c = Category::parse("  Dairy  ").unwrap();
        assert_eq!(c.as_str(), "dairy");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Category::parse(""), Err(CategoryError::Empty)));
        assert!(matches!(Category::parse("   "), Err(CategoryError::Empty)));
    }

    #[test]
    fn test_mixed_case_are_equal() {
        let a = Category::parse("Produce").unwrap();
        let b = Category::parse("produce").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = Category::parse("snacks").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"snacks\"");

        let parsed: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn test_from_str() {
        let c: Category = "Beverages".parse().unwrap();
        assert_eq!(c.as_str(), "beverages");
    }
}
