//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartViolation};
pub use id::*;
pub use price::Price;
pub use product::{Product, Stock};
