//! Request-scoped services for storefront.
//!
//! # Services
//!
//! - `cart` - The visitor's cart, persisted in their session

pub mod cart;

pub use cart::{SessionCart, SessionSnapshot};
