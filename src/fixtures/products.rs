//! Product Fixtures

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    catalog::CatalogProduct, fixtures::FixtureError, pricing::to_minor_units,
    products::ProductId,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products, in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price (e.g., "79.99 USD")
    pub price: String,

    /// Price before markdown, same format as `price`
    #[serde(default)]
    pub original_price: Option<String>,

    /// Primary image URL
    pub image: String,

    /// Gallery image URLs
    #[serde(default)]
    pub images: Vec<String>,

    /// Average review rating
    #[serde(default)]
    pub rating: Option<f64>,

    /// Number of reviews
    #[serde(default)]
    pub review_count: Option<u32>,

    /// Category name
    pub category: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Feature bullet points
    #[serde(default)]
    pub features: Vec<String>,

    /// Whether the product can be ordered
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,

    /// Units available
    #[serde(default)]
    pub stock_quantity: u32,
}

fn in_stock_default() -> bool {
    true
}

impl ProductFixture {
    /// Convert into a catalog product, returning the currency it is priced in.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed or the original price uses a
    /// different currency from the price.
    pub fn try_into_product(self) -> Result<(CatalogProduct, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        let original_price = match self.original_price.as_deref() {
            Some(original) => {
                let (original_price, original_currency) = parse_price(original)?;

                if original_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        original_currency.iso_alpha_code.to_string(),
                    ));
                }

                Some(original_price)
            }
            None => None,
        };

        let product = CatalogProduct {
            id: self.id,
            name: self.name,
            price,
            original_price,
            image: self.image,
            images: SmallVec::from_vec(self.images),
            rating: self.rating,
            review_count: self.review_count,
            category: self.category,
            description: self.description,
            features: SmallVec::from_vec(self.features),
            in_stock: self.in_stock,
            stock_quantity: self.stock_quantity,
        };

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "2.99 GBP") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, is negative, is finer than
/// the currency's minor unit or does not fit in minor units, or if the
/// currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    if amount.normalize().scale() > currency.exponent {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    to_minor_units(amount).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        assert!(matches!(
            parse_price("-1.00 USD"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_accepts_supported_currencies() -> Result<(), FixtureError> {
        let (usd_amount, usd) = parse_price("79.99 USD")?;
        let (gbp_amount, gbp) = parse_price("3 GBP")?;
        let (eur_amount, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_amount, Decimal::new(7999, 2));
        assert_eq!(usd, USD);
        assert_eq!(gbp_amount, Decimal::new(3, 0));
        assert_eq!(gbp, GBP);
        assert_eq!(eur_amount, Decimal::new(250, 2));
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_sub_cent_amounts() {
        assert!(matches!(
            parse_price("79.999 USD"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_accepts_trailing_zeros() -> Result<(), FixtureError> {
        let (amount, _) = parse_price("79.990 USD")?;

        assert_eq!(amount, Decimal::new(7999, 2));

        Ok(())
    }

    #[test]
    fn parse_price_rejects_amounts_beyond_minor_units() {
        assert!(matches!(
            parse_price("100000000000000000000 USD"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn fixture_defaults_optional_fields() -> Result<(), FixtureError> {
        let fixture: ProductFixture = serde_norway::from_str(
            "id: p9\nname: Desk Lamp\nprice: 34.99 USD\nimage: lamp.jpg\ncategory: Home & Garden\n",
        )?;

        let (product, currency) = fixture.try_into_product()?;

        assert_eq!(currency, USD);
        assert_eq!(product.price, Decimal::new(3499, 2));
        assert!(product.in_stock);
        assert_eq!(product.stock_quantity, 0);
        assert!(product.features.is_empty());
        assert!(product.original_price.is_none());

        Ok(())
    }

    #[test]
    fn fixture_rejects_original_price_in_other_currency() -> Result<(), FixtureError> {
        let fixture: ProductFixture = serde_norway::from_str(
            "id: p1\nname: Headphones\nprice: 79.99 USD\noriginal_price: 99.99 GBP\nimage: h.jpg\ncategory: Electronics\n",
        )?;

        assert!(matches!(
            fixture.try_into_product(),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));

        Ok(())
    }
}
