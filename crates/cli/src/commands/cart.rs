//! `shophub cart`

use std::io;

use clap::{Args, Subcommand};
use shophub::receipt::Receipt;
use tracing::warn;

use crate::{commands::Context, error::CliError};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    pub(crate) command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CartSubcommand {
    /// Show the cart with its total
    Show,

    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Set the quantity of a product already in the cart
    Update(UpdateArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product id
    pub(crate) id: String,

    /// Units to add, limited to what is in stock
    #[arg(short, long, default_value_t = 1)]
    pub(crate) quantity: i64,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Product id
    pub(crate) id: String,
}

#[derive(Debug, Args)]
pub(crate) struct UpdateArgs {
    /// Product id
    pub(crate) id: String,

    /// New quantity; 0 or less removes the product
    #[arg(allow_negative_numbers = true)]
    pub(crate) quantity: i64,
}

pub(crate) fn run(
    command: CartCommand,
    context: &mut Context,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    // Restore failures were logged when the store opened.
    if let Some(error) = context.store.take_persistence_error() {
        warn!("continuing with an empty cart: {error}");
    }

    match command.command {
        CartSubcommand::Show => return show(context, out),
        CartSubcommand::Add(args) => add(context, &args)?,
        CartSubcommand::Remove(args) => context.store.remove_from_cart(&args.id),
        CartSubcommand::Update(args) => context.store.update_quantity(&args.id, args.quantity),
        CartSubcommand::Clear => {
            context.store.clear_cart();
            writeln!(out, "Cart cleared")?;
        }
    }

    match context.store.take_persistence_error() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn show(context: &Context, out: &mut impl io::Write) -> Result<(), CliError> {
    Receipt::from_cart(context.store.cart(), context.catalog.currency())?.write_to(out)?;

    Ok(())
}

fn add(context: &mut Context, args: &AddArgs) -> Result<(), CliError> {
    let product = context
        .catalog
        .get_product_by_id(&args.id)
        .ok_or_else(|| CliError::UnknownProduct(args.id.clone()))?;

    if !product.in_stock {
        return Err(CliError::OutOfStock(product.name.clone()));
    }

    let quantity = product.clamp_order_quantity(args.quantity);

    context.store.add_to_cart(product, i64::from(quantity));

    Ok(())
}
