//! Persistence
//!
//! The cart snapshot is the whole item sequence, JSON-encoded under a single
//! storage key. Loading is lenient: records missing an id, price or quantity
//! are skipped so a partially damaged snapshot still restores whatever it can.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartItem},
    products::{Product, ProductId},
    storage::{KeyValueStore, StorageError},
};

/// Storage key holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "shophub_cart";

/// Errors raised while loading or saving the cart snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage backend could not be read.
    #[error("failed to read cart snapshot: {0}")]
    Read(#[source] StorageError),

    /// The storage backend rejected the write.
    #[error("failed to write cart snapshot: {0}")]
    Write(#[source] StorageError),

    /// The cart could not be serialized.
    #[error("failed to encode cart snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored value is not valid JSON.
    #[error("failed to decode cart snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    /// The stored value is JSON, but not a list of records.
    #[error("cart snapshot is not a list of items")]
    NotAnArray,
}

/// A cart item as it appears in the stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    /// Product identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Average review rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Number of reviews
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,

    /// Price before any markdown
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,

    /// Quantity in the cart
    pub quantity: u32,
}

impl From<&CartItem> for CartItemRecord {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            rating: item.rating,
            review_count: item.review_count,
            original_price: item.original_price,
            quantity: item.quantity(),
        }
    }
}

/// Why a decoded record cannot become a cart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record has a quantity of zero.
    #[error("quantity is zero")]
    ZeroQuantity,

    /// Price times quantity does not fit in a decimal.
    #[error("line total overflows")]
    Overflow,
}

impl CartItemRecord {
    /// Convert into a cart item.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] for a zero quantity, or a price and quantity
    /// whose product does not fit in a [`Decimal`].
    pub fn into_item(self) -> Result<CartItem, RecordError> {
        let quantity = NonZeroU32::new(self.quantity).ok_or(RecordError::ZeroQuantity)?;

        self.price
            .checked_mul(Decimal::from(quantity.get()))
            .ok_or(RecordError::Overflow)?;

        let product = Product {
            id: ProductId::new(self.id),
            name: self.name,
            price: self.price,
            image: self.image,
            rating: self.rating,
            review_count: self.review_count,
            original_price: self.original_price,
        };

        Ok(CartItem::new(product, quantity))
    }
}

/// Serialize the cart into its snapshot form.
///
/// # Errors
///
/// Returns [`PersistenceError::Encode`] if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, PersistenceError> {
    let records: Vec<CartItemRecord> = cart.iter().map(CartItemRecord::from).collect();

    serde_json::to_string(&records).map_err(PersistenceError::Encode)
}

/// Rebuild a cart from its snapshot form.
///
/// Records that fail to decode, carry a zero quantity, or whose line total
/// overflows are skipped. A missing `name` or `image` decodes as empty.
/// Records sharing an id are merged into the first occurrence.
///
/// # Errors
///
/// Returns [`PersistenceError::Decode`] if the value is not JSON, or
/// [`PersistenceError::NotAnArray`] if it is not a JSON array.
pub fn decode(raw: &str) -> Result<Cart, PersistenceError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(PersistenceError::Decode)?;

    let serde_json::Value::Array(values) = value else {
        return Err(PersistenceError::NotAnArray);
    };

    let items = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<CartItemRecord>(value) {
                Ok(record) => match record.into_item() {
                    Ok(item) => Some(item),
                    Err(error) => {
                        warn!(index, "skipping cart record: {error}");
                        None
                    }
                },
                Err(error) => {
                    warn!(index, "skipping unreadable cart record: {error}");
                    None
                }
            }
        });

    Ok(Cart::from_items(items))
}

/// Load the cart stored under `key`. A missing key yields an empty cart.
///
/// # Errors
///
/// Returns a [`PersistenceError`] if the backend cannot be read or the stored
/// value cannot be decoded.
pub fn hydrate<S>(storage: &S, key: &str) -> Result<Cart, PersistenceError>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = storage.get(key).map_err(PersistenceError::Read)? else {
        debug!(key, "no stored cart");
        return Ok(Cart::new());
    };

    decode(&raw)
}

/// Write the cart under `key`.
///
/// # Errors
///
/// Returns a [`PersistenceError`] if the cart cannot be encoded or the backend
/// rejects the write.
pub fn persist<S>(storage: &mut S, key: &str, cart: &Cart) -> Result<(), PersistenceError>
where
    S: KeyValueStore + ?Sized,
{
    let encoded = encode(cart)?;

    storage
        .set(key, &encoded)
        .map_err(PersistenceError::Write)
}
