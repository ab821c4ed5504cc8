//! Cart Store
//!
//! The session's authoritative cart. It is constructed once with its storage
//! backend and notifier and handed to whatever needs it; there is no global
//! instance.
//!
//! Every change is written back to storage straight away. Storage failures
//! never reach callers: they are logged, kept as
//! [`CartStore::persistence_error`], and the in-memory cart carries on.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::{
    cart::{AddOutcome, Cart, CartItem, DecrementOutcome},
    notifications::{Notification, Notifier, TracingNotifier},
    persistence::{self, CART_STORAGE_KEY, PersistenceError},
    products::Product,
    storage::KeyValueStore,
};

/// What [`CartStore::add_to_cart`] does with a quantity below 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonPositiveAdd {
    /// Leave the cart untouched and log a warning.
    #[default]
    Ignore,

    /// Subtract the magnitude from an existing item, removing it when nothing
    /// is left. Products not in the cart are left alone.
    Decrement,
}

/// Cart store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Storage key for the cart snapshot.
    pub storage_key: String,

    /// Handling of non-positive quantities passed to `add_to_cart`.
    pub non_positive_add: NonPositiveAdd,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: CART_STORAGE_KEY.to_string(),
            non_positive_add: NonPositiveAdd::default(),
        }
    }
}

/// Cart Store
#[derive(Debug)]
pub struct CartStore<S, N = TracingNotifier> {
    cart: Cart,
    storage: S,
    notifier: N,
    config: CartConfig,
    persistence_error: Option<PersistenceError>,
}

impl<S: KeyValueStore, N: Notifier> CartStore<S, N> {
    /// Create a store using the default configuration, restoring any cart
    /// previously saved in `storage`.
    pub fn new(storage: S, notifier: N) -> Self {
        Self::with_config(storage, notifier, CartConfig::default())
    }

    /// Create a store, restoring any cart previously saved in `storage`.
    ///
    /// A missing snapshot gives an empty cart. An unreadable or corrupt one
    /// also gives an empty cart, with the failure kept in
    /// [`persistence_error`](Self::persistence_error).
    pub fn with_config(storage: S, notifier: N, config: CartConfig) -> Self {
        let (cart, persistence_error) = match persistence::hydrate(&storage, &config.storage_key)
        {
            Ok(cart) => {
                debug!(
                    key = %config.storage_key,
                    items = cart.len(),
                    "restored cart"
                );

                (cart, None)
            }
            Err(error) => {
                warn!(
                    key = %config.storage_key,
                    "failed to restore cart, starting empty: {error}"
                );

                (Cart::new(), Some(error))
            }
        };

        Self {
            cart,
            storage,
            notifier,
            config,
            persistence_error,
        }
    }

    /// Add `quantity` units of `product` to the cart.
    ///
    /// A product already in the cart keeps its position and the details it
    /// was first added with; only its quantity grows. Quantities below 1 are
    /// handled according to [`CartConfig::non_positive_add`].
    #[instrument(level = "debug", skip_all, fields(quantity = quantity))]
    pub fn add_to_cart(&mut self, product: impl Into<Product>, quantity: i64) {
        let product = product.into();

        if quantity <= 0 {
            self.add_non_positive(&product, quantity);
            return;
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);

        let name = product.name.clone();

        let notification = match self.cart.add(product, quantity) {
            AddOutcome::Inserted => Notification::Added { name },
            AddOutcome::Merged { quantity } => {
                debug!(quantity = quantity.get(), "merged into existing item");
                Notification::QuantityUpdated { name }
            }
        };

        self.persist();
        self.notifier.notify(notification);
    }

    /// Add a single unit of `product` to the cart.
    pub fn add_one(&mut self, product: impl Into<Product>) {
        self.add_to_cart(product, 1);
    }

    /// Remove the product from the cart. Unknown ids are ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_from_cart(&mut self, product_id: &str) {
        let Some(item) = self.cart.remove(product_id) else {
            debug!("product not in cart");
            return;
        };

        self.persist();
        self.notifier.notify(Notification::Removed {
            name: item.name.clone(),
        });
    }

    /// Replace the quantity of a product in the cart.
    ///
    /// A quantity of 0 or less removes the product. Unknown ids are ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);

        if self.cart.set_quantity(product_id, quantity) {
            self.persist();
        } else {
            debug!("product not in cart");
        }
    }

    /// Sum of price times quantity over every item.
    pub fn get_cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// Total number of units in the cart.
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    /// Empty the cart.
    #[instrument(level = "debug", skip(self))]
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Items in the order they were first added.
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// The underlying cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The store configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Failure from the most recent load or save, if it failed.
    pub fn persistence_error(&self) -> Option<&PersistenceError> {
        self.persistence_error.as_ref()
    }

    /// Take the failure from the most recent load or save, leaving none behind.
    pub fn take_persistence_error(&mut self) -> Option<PersistenceError> {
        self.persistence_error.take()
    }

    /// Consume the store, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn add_non_positive(&mut self, product: &Product, quantity: i64) {
        let by = NonZeroU32::new(u32::try_from(quantity.unsigned_abs()).unwrap_or(u32::MAX));

        let (NonPositiveAdd::Decrement, Some(by)) = (self.config.non_positive_add, by) else {
            warn!(
                product_id = %product.id,
                "ignoring add with non-positive quantity {quantity}"
            );
            return;
        };

        match self.cart.decrement(product.id.as_str(), by) {
            DecrementOutcome::Decremented { quantity } => {
                debug!(quantity = quantity.get(), "decremented existing item");

                self.persist();
                self.notifier.notify(Notification::QuantityUpdated {
                    name: product.name.clone(),
                });
            }
            DecrementOutcome::Removed(item) => {
                self.persist();
                self.notifier.notify(Notification::Removed {
                    name: item.name.clone(),
                });
            }
            DecrementOutcome::NotFound => {
                debug!(product_id = %product.id, "nothing to decrement");
            }
        }
    }

    fn persist(&mut self) {
        let result = persistence::persist(&mut self.storage, &self.config.storage_key, &self.cart);

        self.persistence_error = match result {
            Ok(()) => None,
            Err(error) => {
                warn!(
                    key = %self.config.storage_key,
                    "failed to save cart, keeping in-memory changes: {error}"
                );

                Some(error)
            }
        };
    }
}
