//! Cart
//!
//! The cart aggregate: an ordered sequence of line items, unique by product id.
//! Transitions here are pure; deciding what to persist or announce is left to
//! [`CartStore`](crate::store::CartStore).

use std::{num::NonZeroU32, ops::Deref};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::warn;

use crate::{
    pricing::{PricingError, to_money},
    products::Product,
};

/// A product in the cart, with the quantity requested.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    product: Product,
    quantity: NonZeroU32,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(product: Product, quantity: NonZeroU32) -> Self {
        Self { product, quantity }
    }

    /// The product as captured when it was first added.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Quantity of this product in the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price multiplied by quantity, or `None` if it does not fit in a
    /// [`Decimal`].
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.product
            .price
            .checked_mul(Decimal::from(self.quantity.get()))
    }

    /// Unit price multiplied by quantity, saturating at the [`Decimal`] bounds.
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or_else(|| {
            warn!(id = %self.product.id, "line total overflowed, saturating");

            self.product
                .price
                .saturating_mul(Decimal::from(self.quantity.get()))
        })
    }
}

impl Deref for CartItem {
    type Target = Product;

    fn deref(&self) -> &Self::Target {
        &self.product
    }
}

/// Result of adding a product to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was not in the cart and has been appended.
    Inserted,

    /// The product was already in the cart; its quantity is now `quantity`.
    Merged {
        /// Accumulated quantity after the merge.
        quantity: NonZeroU32,
    },
}

/// Result of taking units away from an item.
#[derive(Debug, Clone, PartialEq)]
pub enum DecrementOutcome {
    /// The item stays in the cart with the remaining quantity.
    Decremented {
        /// Quantity left after the decrement.
        quantity: NonZeroU32,
    },

    /// Nothing was left, so the item has been removed.
    Removed(CartItem),

    /// No item with that id is in the cart.
    NotFound,
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from a sequence of items.
    ///
    /// Items sharing an id are folded into the first occurrence, summing
    /// their quantities, so the result is always unique by id.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();

        for item in items {
            let CartItem { product, quantity } = item;
            cart.add(product, quantity);
        }

        cart
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing item keeps its position and stored fields and has its
    /// quantity incremented; a new product is appended to the end.
    pub fn add(&mut self, product: Product, quantity: NonZeroU32) -> AddOutcome {
        if let Some(item) = self.find_mut(product.id.as_str()) {
            item.quantity = item.quantity.saturating_add(quantity.get());

            return AddOutcome::Merged {
                quantity: item.quantity,
            };
        }

        self.items.push(CartItem::new(product, quantity));

        AddOutcome::Inserted
    }

    /// Remove the item with the given id, returning it if it was present.
    pub fn remove(&mut self, product_id: &str) -> Option<CartItem> {
        let position = self.position(product_id)?;

        Some(self.items.remove(position))
    }

    /// Replace the quantity of an existing item.
    ///
    /// Returns `false` if no item has that id.
    pub fn set_quantity(&mut self, product_id: &str, quantity: NonZeroU32) -> bool {
        match self.find_mut(product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Take `by` units away from an item, removing it when none are left.
    pub fn decrement(&mut self, product_id: &str, by: NonZeroU32) -> DecrementOutcome {
        let Some(position) = self.position(product_id) else {
            return DecrementOutcome::NotFound;
        };

        let remaining = self
            .items
            .get(position)
            .and_then(|item| NonZeroU32::new(item.quantity().saturating_sub(by.get())));

        match remaining {
            Some(quantity) => {
                if let Some(item) = self.items.get_mut(position) {
                    item.quantity = quantity;
                }

                DecrementOutcome::Decremented { quantity }
            }
            None => DecrementOutcome::Removed(self.items.remove(position)),
        }
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get the item with the given id.
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.id.as_str() == product_id)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all items.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Sum of price times quantity across all items.
    ///
    /// Saturates at the [`Decimal`] bounds instead of overflowing.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, |total, line| {
                total.checked_add(line).unwrap_or_else(|| {
                    warn!("cart total overflowed, saturating");
                    total.saturating_add(line)
                })
            })
    }

    /// The cart total expressed in the given currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total does not fit in minor units.
    pub fn total_money(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        to_money(self.total(), currency)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.id.as_str() == product_id)
    }

    fn find_mut(&mut self, product_id: &str) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.id.as_str() == product_id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
