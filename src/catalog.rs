//! Catalog
//!
//! Read-only product catalog with the lookups the storefront pages use.

use std::{cmp::Ordering, fmt};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    fixtures::{self, FixtureError},
    pricing::discount_percent,
    products::{Product, ProductId},
};

/// Name of the category sentinel that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Order quantity ceiling used when a product has no stock figure.
pub const DEFAULT_MAX_ORDER_QUANTITY: u32 = 99;

new_key_type! {
    /// Catalog Product Key
    pub struct CatalogKey;
}

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// No products were supplied.
    #[error("catalog has no products")]
    Empty,
}

/// Product as listed in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price in major units
    pub price: Decimal,

    /// Price before any markdown
    pub original_price: Option<Decimal>,

    /// Primary image URL
    pub image: String,

    /// Gallery image URLs
    pub images: SmallVec<[String; 3]>,

    /// Average review rating
    pub rating: Option<f64>,

    /// Number of reviews
    pub review_count: Option<u32>,

    /// Category name
    pub category: String,

    /// Long description
    pub description: String,

    /// Feature bullet points
    pub features: SmallVec<[String; 6]>,

    /// Whether the product can currently be ordered
    pub in_stock: bool,

    /// Units available
    pub stock_quantity: u32,
}

impl CatalogProduct {
    /// Whole-number markdown against the original price, or 0 if none.
    pub fn discount_percent(&self) -> u32 {
        self.original_price
            .map_or(0, |original| discount_percent(self.price, original))
    }

    /// Largest quantity a shopper may select for this product.
    pub fn max_order_quantity(&self) -> u32 {
        if self.stock_quantity == 0 {
            DEFAULT_MAX_ORDER_QUANTITY
        } else {
            self.stock_quantity
        }
    }

    /// Clamp a requested quantity into `1..=max_order_quantity()`.
    pub fn clamp_order_quantity(&self, requested: i64) -> u32 {
        let max = self.max_order_quantity();

        u32::try_from(requested.clamp(1, i64::from(max))).unwrap_or(max)
    }

    fn matches_search(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.description.to_lowercase().contains(query)
            || self.category.to_lowercase().contains(query)
    }
}

impl From<&CatalogProduct> for Product {
    fn from(product: &CatalogProduct) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            rating: product.rating,
            review_count: product.review_count,
            original_price: product.original_price,
        }
    }
}

impl From<CatalogProduct> for Product {
    fn from(product: CatalogProduct) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            rating: product.rating,
            review_count: product.review_count,
            original_price: product.original_price,
        }
    }
}

/// Category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Category {
    /// Every product.
    #[default]
    All,

    /// Products in the named category.
    Named(String),
}

impl Category {
    fn matches(&self, product: &CatalogProduct) -> bool {
        match self {
            Category::All => true,
            Category::Named(name) => product.category == *name,
        }
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        if name == ALL_CATEGORIES {
            Category::All
        } else {
            Category::Named(name.to_string())
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str(ALL_CATEGORIES),
            Category::Named(name) => f.write_str(name),
        }
    }
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,

    /// Cheapest first.
    PriceLowToHigh,

    /// Most expensive first.
    PriceHighToLow,

    /// Highest rated first; unrated products count as 0.
    Rating,
}

/// Listing query: category filter, free-text search, sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Category to list. Ignored while a search is active.
    pub category: Category,

    /// Case-insensitive search over name, description and category.
    pub search: Option<String>,

    /// Sort order.
    pub sort: SortOrder,
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: SlotMap<CatalogKey, CatalogProduct>,
    order: Vec<CatalogKey>,
    keys: FxHashMap<ProductId, CatalogKey>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from products priced in `currency`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if no products are given or two share an id.
    pub fn new(
        products: impl IntoIterator<Item = CatalogProduct>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            products: SlotMap::with_key(),
            order: Vec::new(),
            keys: FxHashMap::default(),
            currency,
        };

        for product in products {
            if catalog.keys.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.to_string()));
            }

            let id = product.id.clone();
            let key = catalog.products.insert(product);

            catalog.order.push(key);
            catalog.keys.insert(id, key);
        }

        if catalog.order.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(catalog)
    }

    /// Parse a catalog from fixture YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the fixture is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        fixtures::load_catalog(yaml)
    }

    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the bundled fixture fails to load.
    pub fn bundled() -> Result<Self, FixtureError> {
        fixtures::bundled_catalog()
    }

    /// Currency every price is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Look up a product by id.
    pub fn get_product_by_id(&self, id: &str) -> Option<&CatalogProduct> {
        self.keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Products in `category`, in catalog order. [`Category::All`] returns everything.
    pub fn products_by_category(&self, category: &Category) -> Vec<&CatalogProduct> {
        self.iter().filter(|product| category.matches(product)).collect()
    }

    /// The `All` sentinel followed by each distinct category, in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = vec![Category::All];

        for product in self.iter() {
            let category = Category::Named(product.category.clone());

            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        categories
    }

    /// Products whose name, description or category contains `query`, ignoring case.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&CatalogProduct> {
        let query = query.trim().to_lowercase();

        self.iter()
            .filter(|product| query.is_empty() || product.matches_search(&query))
            .collect()
    }

    /// The first `count` products, as shown on the home page.
    pub fn featured(&self, count: usize) -> Vec<&CatalogProduct> {
        self.iter().take(count).collect()
    }

    /// Run a listing query: filter by category (or search), then sort.
    pub fn browse(&self, query: &Query) -> Vec<&CatalogProduct> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty());

        let mut products = match search {
            Some(search) => self.search(search),
            None => self.products_by_category(&query.category),
        };

        sort_products(&mut products, query.sort);

        products
    }
}

fn sort_products(products: &mut [&CatalogProduct], sort: SortOrder) {
    match sort {
        SortOrder::Default => {}
        SortOrder::PriceLowToHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Rating => products.sort_by(|a, b| compare_rating(b, a)),
    }
}

fn compare_rating(a: &CatalogProduct, b: &CatalogProduct) -> Ordering {
    a.rating.unwrap_or(0.0).total_cmp(&b.rating.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn catalog_product(id: &str, category: &str, price: i64, rating: Option<f64>) -> CatalogProduct {
        CatalogProduct {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(price, 0),
            original_price: None,
            image: format!("https://example.com/{id}.jpg"),
            images: smallvec![],
            rating,
            review_count: None,
            category: category.to_string(),
            description: format!("About {id}"),
            features: smallvec![],
            in_stock: true,
            stock_quantity: 10,
        }
    }

    fn catalog() -> Result<Catalog, CatalogError> {
        Catalog::new(
            [
                catalog_product("a", "Electronics", 30, Some(4.5)),
                catalog_product("b", "Fashion", 10, None),
                catalog_product("c", "Electronics", 20, Some(4.8)),
                catalog_product("d", "Sports", 10, Some(4.1)),
            ],
            iso::USD,
        )
    }

    fn ids(products: &[&CatalogProduct]) -> Vec<String> {
        products.iter().map(|product| product.id.to_string()).collect()
    }

    #[test]
    fn new_rejects_duplicates_and_empty() {
        let duplicate = Catalog::new(
            [
                catalog_product("a", "Electronics", 1, None),
                catalog_product("a", "Fashion", 2, None),
            ],
            iso::USD,
        );

        assert_eq!(
            duplicate.err(),
            Some(CatalogError::DuplicateProduct("a".to_string()))
        );
        assert_eq!(Catalog::new(Vec::new(), iso::USD).err(), Some(CatalogError::Empty));
    }

    #[test]
    fn get_product_by_id() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(
            catalog.get_product_by_id("c").map(|product| product.price),
            Some(Decimal::new(20, 0))
        );
        assert!(catalog.get_product_by_id("missing").is_none());

        Ok(())
    }

    #[test]
    fn products_by_category_keeps_order() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(
            ids(&catalog.products_by_category(&Category::from("Electronics"))),
            ["a", "c"]
        );
        assert_eq!(ids(&catalog.products_by_category(&Category::All)).len(), 4);
        assert!(
            catalog
                .products_by_category(&Category::from("Garden"))
                .is_empty()
        );

        Ok(())
    }

    #[test]
    fn all_sentinel_parses_to_all() {
        assert_eq!(Category::from("All"), Category::All);
        assert_eq!(Category::All.to_string(), "All");
    }

    #[test]
    fn categories_start_with_all() -> TestResult {
        let catalog = catalog()?;

        let names: Vec<String> = catalog.categories().iter().map(ToString::to_string).collect();

        assert_eq!(names, ["All", "Electronics", "Fashion", "Sports"]);

        Ok(())
    }

    #[test]
    fn search_ignores_case_and_blank_queries() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(ids(&catalog.search("ELECTRONICS")), ["a", "c"]);
        assert_eq!(ids(&catalog.search("about b")), ["b"]);
        assert_eq!(catalog.search("  ").len(), 4);

        Ok(())
    }

    #[test]
    fn browse_sorts_stably() -> TestResult {
        let catalog = catalog()?;

        let by_price = |sort: SortOrder| Query {
            sort,
            ..Query::default()
        };

        assert_eq!(
            ids(&catalog.browse(&by_price(SortOrder::PriceLowToHigh))),
            ["b", "d", "c", "a"]
        );
        assert_eq!(
            ids(&catalog.browse(&by_price(SortOrder::PriceHighToLow))),
            ["a", "c", "b", "d"]
        );
        assert_eq!(
            ids(&catalog.browse(&by_price(SortOrder::Rating))),
            ["c", "a", "d", "b"]
        );

        Ok(())
    }

    #[test]
    fn browse_search_overrides_category() -> TestResult {
        let catalog = catalog()?;

        let query = Query {
            category: Category::from("Fashion"),
            search: Some("product d".to_string()),
            sort: SortOrder::Default,
        };

        assert_eq!(ids(&catalog.browse(&query)), ["d"]);

        Ok(())
    }

    #[test]
    fn featured_takes_leading_products() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(ids(&catalog.featured(3)), ["a", "b", "c"]);
        assert_eq!(catalog.featured(10).len(), 4);

        Ok(())
    }

    #[test]
    fn clamp_order_quantity_respects_stock() {
        let mut product = catalog_product("a", "Electronics", 1, None);

        assert_eq!(product.clamp_order_quantity(0), 1);
        assert_eq!(product.clamp_order_quantity(4), 4);
        assert_eq!(product.clamp_order_quantity(50), 10);

        product.stock_quantity = 0;

        assert_eq!(product.clamp_order_quantity(500), DEFAULT_MAX_ORDER_QUANTITY);
    }

    #[test]
    fn into_cart_product_keeps_display_fields() {
        let mut product = catalog_product("a", "Electronics", 30, Some(4.5));
        product.original_price = Some(Decimal::new(40, 0));

        let cart_product = Product::from(&product);

        assert_eq!(cart_product.id, product.id);
        assert_eq!(cart_product.price, Decimal::new(30, 0));
        assert_eq!(cart_product.rating, Some(4.5));
        assert_eq!(cart_product.original_price, Some(Decimal::new(40, 0)));
        assert_eq!(product.discount_percent(), 25);
    }

    #[test]
    fn from_yaml_keeps_fixture_order() -> TestResult {
        let catalog = Catalog::from_yaml(
            r"
products:
  - id: lamp
    name: Desk Lamp
    price: 34.99 GBP
    image: lamp.jpg
    category: Home & Garden
  - id: mat
    name: Yoga Mat
    price: 24.99 GBP
    original_price: 29.99 GBP
    image: mat.jpg
    category: Sports
",
        )?;

        assert_eq!(catalog.currency(), iso::GBP);
        assert_eq!(ids(&catalog.featured(5)), ["lamp", "mat"]);
        assert_eq!(
            catalog.get_product_by_id("mat").map(CatalogProduct::discount_percent),
            Some(17)
        );

        Ok(())
    }
}
