//! ShopHub
//!
//! Storefront core for ShopHub: a read-only product catalog, and a shopping cart
//! that survives restarts by persisting to a durable key-value slot.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod notifications;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod store;
