//! `shophub catalog`

use std::io;

use clap::{Args, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use shophub::{
    catalog::{Catalog, CatalogProduct, Category, Query, SortOrder},
    pricing::{PricingError, to_money},
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use crate::error::CliError;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    pub(crate) command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CatalogSubcommand {
    /// List products
    List(ListArgs),

    /// Show one product in detail
    Show(ShowArgs),

    /// List categories with their product counts
    Categories,
}

/// Listing sort order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum SortArg {
    /// Catalog order
    #[default]
    Default,

    /// Cheapest first
    PriceLowToHigh,

    /// Most expensive first
    PriceHighToLow,

    /// Highest rated first
    Rating,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Default => SortOrder::Default,
            SortArg::PriceLowToHigh => SortOrder::PriceLowToHigh,
            SortArg::PriceHighToLow => SortOrder::PriceHighToLow,
            SortArg::Rating => SortOrder::Rating,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Category to list ("All" for every product)
    #[arg(long, default_value = "All")]
    pub(crate) category: String,

    /// Search name, description and category; overrides --category
    #[arg(long)]
    pub(crate) search: Option<String>,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortArg::Default)]
    pub(crate) sort: SortArg,
}

impl From<ListArgs> for Query {
    fn from(args: ListArgs) -> Self {
        Self {
            category: Category::from(args.category.as_str()),
            search: args.search,
            sort: args.sort.into(),
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Product id
    pub(crate) id: String,
}

pub(crate) fn run(
    command: CatalogCommand,
    catalog: &Catalog,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    match command.command {
        CatalogSubcommand::List(args) => list(catalog, &args.into(), out),
        CatalogSubcommand::Show(args) => show(catalog, &args.id, out),
        CatalogSubcommand::Categories => categories(catalog, out),
    }
}

fn list(catalog: &Catalog, query: &Query, out: &mut impl io::Write) -> Result<(), CliError> {
    let products = catalog.browse(query);

    if products.is_empty() {
        writeln!(out, "No products found")?;

        return Ok(());
    }

    let currency = catalog.currency();
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Category", "Price", "Was", "Rating", "Stock"]);

    for product in &products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            money(product.price, currency)?,
            original_price_cell(product, currency)?,
            rating_cell(product),
            stock_cell(product),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "{} products", products.len())?;

    Ok(())
}

fn show(catalog: &Catalog, id: &str, out: &mut impl io::Write) -> Result<(), CliError> {
    let product = catalog
        .get_product_by_id(id)
        .ok_or_else(|| CliError::UnknownProduct(id.to_string()))?;

    let currency = catalog.currency();

    writeln!(out, "{} ({})", product.name, product.id)?;
    writeln!(out, "Category: {}", product.category)?;

    match product.discount_percent() {
        0 => writeln!(out, "Price: {}", money(product.price, currency)?)?,
        percent => writeln!(
            out,
            "Price: {} (was {}, {percent}% off)",
            money(product.price, currency)?,
            original_price_cell(product, currency)?
        )?,
    }

    writeln!(out, "Rating: {}", rating_cell(product))?;
    writeln!(out, "Stock: {}", stock_cell(product))?;

    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }

    if !product.features.is_empty() {
        writeln!(out)?;

        for feature in &product.features {
            writeln!(out, "  - {feature}")?;
        }
    }

    Ok(())
}

fn categories(catalog: &Catalog, out: &mut impl io::Write) -> Result<(), CliError> {
    let mut builder = Builder::default();

    builder.push_record(["Category", "Products"]);

    for category in catalog.categories() {
        let count = catalog.products_by_category(&category).len();

        builder.push_record([category.to_string(), count.to_string()]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::last(), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn money(amount: Decimal, currency: &'static Currency) -> Result<String, PricingError> {
    Ok(to_money(amount, currency)?.to_string())
}

fn original_price_cell(
    product: &CatalogProduct,
    currency: &'static Currency,
) -> Result<String, PricingError> {
    match product.original_price {
        Some(original) if product.discount_percent() > 0 => money(original, currency),
        _ => Ok(String::new()),
    }
}

fn rating_cell(product: &CatalogProduct) -> String {
    match (product.rating, product.review_count) {
        (Some(rating), Some(reviews)) => format!("{rating:.1} ({reviews} reviews)"),
        (Some(rating), None) => format!("{rating:.1}"),
        (None, _) => "-".to_string(),
    }
}

fn stock_cell(product: &CatalogProduct) -> String {
    if product.in_stock {
        product.stock_quantity.to_string()
    } else {
        "out of stock".to_string()
    }
}
