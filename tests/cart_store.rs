//! Integration tests for cart store behaviour

use rust_decimal::Decimal;
use testresult::TestResult;

use shophub::{
    catalog::Catalog,
    notifications::{NoopNotifier, Notification, Notifier, RecordingNotifier},
    products::Product,
    storage::MemoryStore,
    store::{CartConfig, CartStore, NonPositiveAdd},
};

fn product(id: &str, price: i64) -> Product {
    Product::new(id, format!("Product {id}"), Decimal::new(price, 0), "img")
}

fn ids(store: &CartStore<MemoryStore, impl Notifier>) -> Vec<&str> {
    store.items().iter().map(|item| item.id.as_str()).collect()
}

#[test]
fn repeated_adds_keep_one_entry_per_product() {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    for id in ["p1", "p2", "p1", "p3", "p2", "p1"] {
        store.add_to_cart(product(id, 10), 1);
    }

    assert_eq!(ids(&store), ["p1", "p2", "p3"]);
    assert_eq!(store.cart_count(), 6);
}

#[test]
fn merge_accumulates_at_original_position() -> TestResult {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    store.add_to_cart(product("a", 10), 2);
    store.add_to_cart(product("b", 10), 1);
    store.add_to_cart(product("a", 10), 3);

    let first = store.items().first().ok_or("cart is empty")?;

    assert_eq!(store.items().len(), 2);
    assert_eq!(first.id.as_str(), "a");
    assert_eq!(first.quantity(), 5);

    Ok(())
}

#[test]
fn merge_keeps_first_captured_details() -> TestResult {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    store.add_to_cart(product("p1", 10), 1);
    store.add_to_cart(
        Product::new("p1", "Renamed", Decimal::new(99, 0), "other"),
        1,
    );

    let item = store.items().first().ok_or("cart is empty")?;

    assert_eq!(item.name, "Product p1");
    assert_eq!(item.price, Decimal::new(10, 0));
    assert_eq!(store.get_cart_total(), Decimal::new(20, 0));

    Ok(())
}

#[test]
fn count_is_additive() {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    store.add_to_cart(product("p1", 10), 1);
    store.add_to_cart(product("p2", 10), 3);
    store.remove_from_cart("p1");

    assert_eq!(store.cart_count(), 3);
}

#[test]
fn total_is_price_weighted() {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    store.add_to_cart(product("p1", 10), 2);
    store.add_to_cart(product("p2", 5), 1);

    assert_eq!(store.get_cart_total(), Decimal::new(25, 0));
}

#[test]
fn total_keeps_cents_exact() {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    store.add_to_cart(Product::new("p1", "A", Decimal::new(10, 2), "img"), 1);
    store.add_to_cart(Product::new("p2", "B", Decimal::new(20, 2), "img"), 1);

    assert_eq!(store.get_cart_total(), Decimal::new(30, 2));
}

#[test]
fn non_positive_update_removes_like_remove() {
    for quantity in [0, -1, -40] {
        let notifier = RecordingNotifier::new();
        let mut store = CartStore::new(MemoryStore::new(), notifier.clone());

        store.add_to_cart(product("p1", 10), 2);
        store.add_to_cart(product("p2", 10), 1);
        store.update_quantity("p1", quantity);

        assert_eq!(ids(&store), ["p2"]);
        assert_eq!(
            notifier.notifications().last(),
            Some(&Notification::Removed {
                name: "Product p1".to_string()
            })
        );
    }
}

#[test]
fn clear_is_idempotent() {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    store.add_to_cart(product("p1", 10), 2);

    store.clear_cart();
    assert!(store.items().is_empty());
    assert!(store.persistence_error().is_none());

    store.clear_cart();
    assert!(store.items().is_empty());
    assert!(store.persistence_error().is_none());
    assert_eq!(store.get_cart_total(), Decimal::ZERO);
}

#[test]
fn absent_ids_are_no_ops() {
    let notifier = RecordingNotifier::new();
    let mut store = CartStore::new(MemoryStore::new(), notifier.clone());

    store.add_to_cart(product("p1", 10), 2);
    let before = store.items().to_vec();

    store.remove_from_cart("nonexistent");
    store.update_quantity("nonexistent", 5);

    assert_eq!(store.items(), before.as_slice());
    assert_eq!(notifier.messages(), ["Product p1 added to cart"]);
}

#[test]
fn decrement_policy_walks_quantity_down_to_removal() {
    let notifier = RecordingNotifier::new();
    let config = CartConfig {
        non_positive_add: NonPositiveAdd::Decrement,
        ..CartConfig::default()
    };
    let mut store = CartStore::with_config(MemoryStore::new(), notifier.clone(), config);

    store.add_to_cart(product("p1", 10), 3);
    store.add_to_cart(product("p1", 10), -1);

    assert_eq!(store.cart_count(), 2);

    store.add_to_cart(product("p1", 10), -5);

    assert!(store.items().is_empty());
    assert_eq!(
        notifier.messages(),
        [
            "Product p1 added to cart",
            "Updated Product p1 quantity",
            "Product p1 removed from cart"
        ]
    );
}

#[test]
fn ignore_policy_never_produces_empty_quantities() {
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    store.add_to_cart(product("p1", 10), 0);
    store.add_to_cart(product("p2", 10), -3);

    assert!(store.items().is_empty());
    assert_eq!(store.cart_count(), 0);
}

#[test]
fn catalog_products_can_be_added_directly() -> TestResult {
    let catalog = Catalog::bundled()?;
    let mut store = CartStore::new(MemoryStore::new(), NoopNotifier);

    let headphones = catalog.get_product_by_id("p1").ok_or("missing p1")?;
    let quantity = headphones.clamp_order_quantity(2);

    store.add_to_cart(headphones, i64::from(quantity));

    let item = store.items().first().ok_or("cart is empty")?;

    assert_eq!(item.name, "Wireless Headphones");
    assert_eq!(item.original_price, Some(Decimal::new(9999, 2)));
    assert_eq!(store.get_cart_total(), Decimal::new(15998, 2));

    Ok(())
}
