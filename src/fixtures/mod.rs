//! Fixtures
//!
//! Catalog fixtures are YAML lists of products. The storefront's own catalog
//! is embedded at compile time.

use std::{fs, path::Path};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError, CatalogProduct};

pub mod products;

use products::ProductsFixture;

/// The catalog fixture shipped with the crate.
pub const BUNDLED_CATALOG_YAML: &str = include_str!("../../fixtures/products/catalog.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The products do not form a valid catalog
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Load a catalog from fixture YAML.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the YAML cannot be parsed, a price is
/// malformed, products are priced in different currencies, or the products
/// do not form a valid catalog.
pub fn load_catalog(yaml: &str) -> Result<Catalog, FixtureError> {
    let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

    let mut currency: Option<&'static Currency> = None;
    let mut products: Vec<CatalogProduct> = Vec::with_capacity(fixture.products.len());

    for product_fixture in fixture.products {
        let (product, product_currency) = product_fixture.try_into_product()?;

        // Validate currency consistency
        if let Some(existing_currency) = currency {
            if existing_currency != product_currency {
                return Err(FixtureError::CurrencyMismatch(
                    existing_currency.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }
        } else {
            currency = Some(product_currency);
        }

        products.push(product);
    }

    let currency = currency.ok_or(CatalogError::Empty)?;
    let catalog = Catalog::new(products, currency)?;

    debug!(products = catalog.len(), "loaded catalog fixture");

    Ok(catalog)
}

/// Load a catalog from a fixture file.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the file cannot be read or
/// [`load_catalog`] rejects its contents.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, FixtureError> {
    let contents = fs::read_to_string(path)?;

    load_catalog(&contents)
}

/// Load the catalog shipped with the crate.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the embedded fixture is invalid.
pub fn bundled_catalog() -> Result<Catalog, FixtureError> {
    load_catalog(BUNDLED_CATALOG_YAML)
}
