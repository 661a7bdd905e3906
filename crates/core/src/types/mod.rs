//! Core types for LUMINA.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod status;

pub use category::{CategoryFilter, CategoryParseError, ShoeCategory};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
