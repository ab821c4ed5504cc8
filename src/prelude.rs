//! ShopHub prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{AddOutcome, Cart, CartItem, DecrementOutcome},
    catalog::{Catalog, CatalogError, CatalogProduct, Category, Query, SortOrder},
    fixtures::{FixtureError, bundled_catalog, load_catalog, load_catalog_file},
    notifications::{Notification, Notifier, NoopNotifier, RecordingNotifier, TracingNotifier},
    persistence::{CART_STORAGE_KEY, PersistenceError},
    pricing::{PricingError, discount_percent},
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    store::{CartConfig, CartStore, NonPositiveAdd},
};
