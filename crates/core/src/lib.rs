//! Yoloverse Core - Domain types and cart logic.
//!
//! This crate provides the types shared by the storefront and its tests:
//! - catalog entries as served by the kitchen API
//! - the visitor's cart and the store that persists it
//! - validated value types (prices, emails, ids)
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no network, no sessions,
//! no HTTP. Cart persistence goes through the [`cart::CartStorage`] trait so
//! the storefront can back it with whatever per-visitor storage it has.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and emails
//! - [`catalog`] - Menu items and menu filtering
//! - [`cart`] - Cart lines and the cart store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{CART_STORAGE_KEY, CartError, CartLine, CartStorage, CartStore, MemoryStorage};
pub use catalog::{CatalogItem, MenuFilter};
pub use types::*;
