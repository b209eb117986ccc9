//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;

pub use category::{Category, CategoryError};
pub use id::*;
