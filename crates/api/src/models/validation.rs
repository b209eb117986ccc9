//! Field-level request validation.
//!
//! Request bodies carry loosely-typed fields (`serde_json::Value`) so a bad
//! value in one field never aborts deserialization of the whole body; each
//! DTO's `validate()` collects every problem into a [`FieldErrors`] map,
//! one entry per invalid field. Validation always runs before any
//! persistence call.
//!
//! Numeric fields accept both JSON numbers and numeric strings, matching the
//! coercion behavior of the original API clients.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Per-field validation error map: `{ field: [messages...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty error map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// True when no field has errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// Extract a non-empty string from a JSON value.
///
/// Non-string values and empty strings yield `None`.
pub fn nonempty_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Coerce a JSON value to a finite number.
///
/// Accepts JSON numbers and numeric strings; everything else (including
/// NaN/infinite parses) yields `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Coerce a JSON value to an integer.
///
/// Fractional numbers are rejected, not truncated.
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_integer(value: &Value) -> Option<i64> {
    let n = coerce_number(value)?;
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}
