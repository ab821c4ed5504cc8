//! Receipt
//!
//! A priced summary of the cart, rendered as a table for terminal output.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem},
    pricing::{PricingError, to_money},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be expressed in minor units.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One priced line of the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Product name
    pub name: String,

    /// Price of a single unit
    pub unit_price: Money<'static, Currency>,

    /// Units in the cart
    pub quantity: u32,

    /// Unit price multiplied by quantity
    pub line_total: Money<'static, Currency>,
}

impl ReceiptLine {
    fn from_item(item: &CartItem, currency: &'static Currency) -> Result<Self, PricingError> {
        Ok(Self {
            name: item.name.clone(),
            unit_price: to_money(item.price, currency)?,
            quantity: item.quantity(),
            line_total: to_money(item.line_total(), currency)?,
        })
    }
}

/// Priced summary of a cart.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: SmallVec<[ReceiptLine; 10]>,

    /// Total units across all lines
    count: u64,

    /// Markdown against original prices, across all lines
    savings: Money<'static, Currency>,

    /// Sum of line totals
    total: Money<'static, Currency>,

    currency: &'static Currency,
}

impl Receipt {
    /// Price every item in the cart in the given currency.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an amount does not fit in minor units.
    pub fn from_cart(cart: &Cart, currency: &'static Currency) -> Result<Self, ReceiptError> {
        let lines = cart
            .iter()
            .map(|item| ReceiptLine::from_item(item, currency))
            .collect::<Result<SmallVec<[ReceiptLine; 10]>, _>>()?;

        let savings: Decimal = cart
            .iter()
            .filter_map(|item| {
                let original = item.original_price?;

                (original > item.price).then(|| {
                    original
                        .saturating_sub(item.price)
                        .saturating_mul(Decimal::from(item.quantity()))
                })
            })
            .fold(Decimal::ZERO, Decimal::saturating_add);

        Ok(Self {
            lines,
            count: cart.count(),
            savings: to_money(savings, currency)?,
            total: cart.total_money(currency)?,
            currency,
        })
    }

    /// Receipt lines in cart order.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Total units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Amount saved against original prices.
    #[must_use]
    pub fn savings(&self) -> Money<'static, Currency> {
        self.savings
    }

    /// Amount payable. Shipping is free, so this is also the subtotal.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Currency used for all monetary values
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.lines.is_empty() {
            writeln!(out, "Your cart is empty")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Item", "Unit Price", "Qty", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.unit_price.to_string(),
                line.quantity.to_string(),
                line.line_total.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut rows: SmallVec<[(String, String); 4]> = SmallVec::new();

        rows.push((
            format!("Subtotal ({} items):", self.count),
            self.total.to_string(),
        ));
        rows.push(("Shipping:".to_string(), "Free".to_string()));

        if !self.savings.is_zero() {
            rows.push(("You save:".to_string(), self.savings.to_string()));
        }

        rows.push(("Total:".to_string(), self.total.to_string()));

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;
    use crate::products::Product;

    fn item(id: &str, name: &str, minor: i64, quantity: u32) -> TestResult<CartItem> {
        let quantity = NonZeroU32::new(quantity).ok_or("quantity must be non-zero")?;

        Ok(CartItem::new(
            Product::new(id, name, Decimal::new(minor, 2), "img"),
            quantity,
        ))
    }

    #[test]
    fn from_cart_prices_every_line() -> TestResult {
        let cart = Cart::from_items([
            item("p1", "Wireless Headphones", 7999, 2)?,
            item("p3", "Running Shoes", 12999, 1)?,
        ]);

        let receipt = Receipt::from_cart(&cart, USD)?;

        assert_eq!(receipt.lines().len(), 2);
        assert_eq!(receipt.count(), 3);
        assert_eq!(receipt.total(), Money::from_minor(28997, USD));
        assert_eq!(receipt.currency(), USD);

        let first = receipt.lines().first().ok_or("missing first line")?;

        assert_eq!(first.name, "Wireless Headphones");
        assert_eq!(first.unit_price, Money::from_minor(7999, USD));
        assert_eq!(first.line_total, Money::from_minor(15998, USD));

        Ok(())
    }

    #[test]
    fn savings_counts_markdown_per_unit() -> TestResult {
        let mut marked_down = Product::new("p1", "Headphones", Decimal::new(7999, 2), "img");
        marked_down.original_price = Some(Decimal::new(9999, 2));

        let mut marked_up = Product::new("p2", "Watch", Decimal::new(5000, 2), "img");
        marked_up.original_price = Some(Decimal::new(4000, 2));

        let cart = Cart::from_items([
            CartItem::new(marked_down, NonZeroU32::new(3).ok_or("zero")?),
            CartItem::new(marked_up, NonZeroU32::MIN),
        ]);

        let receipt = Receipt::from_cart(&cart, GBP)?;

        assert_eq!(receipt.savings(), Money::from_minor(6000, GBP));

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let cart = Cart::from_items([
            item("p1", "Wireless Headphones", 7999, 2)?,
            item("p2", "Smart Watch", 19999, 1)?,
        ]);

        let mut out = Vec::new();
        Receipt::from_cart(&cart, USD)?.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Wireless Headphones"));
        assert!(output.contains("Smart Watch"));
        assert!(output.contains("Subtotal (3 items):"));
        assert!(output.contains("Free"));
        assert!(output.contains("Total:"));
        assert!(!output.contains("You save:"));

        Ok(())
    }

    #[test]
    fn write_to_keeps_plural_label_for_one_item() -> TestResult {
        let cart = Cart::from_items([item("p1", "Wireless Headphones", 7999, 1)?]);

        let mut out = Vec::new();
        Receipt::from_cart(&cart, USD)?.write_to(&mut out)?;

        assert!(String::from_utf8(out)?.contains("Subtotal (1 items):"));

        Ok(())
    }

    #[test]
    fn from_cart_reports_overflow_instead_of_panicking() -> TestResult {
        let mut product = Product::new("p1", "Headphones", Decimal::MAX, "img");
        product.original_price = Some(Decimal::MAX);

        let cart = Cart::from_items([CartItem::new(
            product,
            NonZeroU32::new(2).ok_or("zero")?,
        )]);

        assert!(matches!(
            Receipt::from_cart(&cart, USD),
            Err(ReceiptError::Pricing(PricingError::Overflow(_)))
        ));

        Ok(())
    }

    #[test]
    fn write_to_empty_cart() -> TestResult {
        let mut out = Vec::new();
        Receipt::from_cart(&Cart::new(), USD)?.write_to(&mut out)?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty\n");

        Ok(())
    }
}
