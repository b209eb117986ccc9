//! Stockroom Core - Shared types library.
//!
//! This crate provides common types used across all Stockroom components:
//! - `api` - The inventory REST service
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and constants - no I/O, no database
//! access, no HTTP handling. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

/// A product is considered low-stock when `quantityInStock` falls strictly
/// below this threshold.
///
/// Repository queries take the threshold as a bound parameter rather than
/// reading this constant directly, so tests can exercise alternate values.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
