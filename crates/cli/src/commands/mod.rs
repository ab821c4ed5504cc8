//! Subcommands

use std::io;

use clap::Subcommand;
use shophub::{
    catalog::Catalog,
    fixtures,
    notifications::RecordingNotifier,
    storage::FileStore,
    store::{CartConfig, CartStore},
};
use tracing::debug;

use crate::{config::Cli, error::CliError};

pub(crate) mod cart;
pub(crate) mod catalog;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Browse the product catalog
    Catalog(catalog::CatalogCommand),

    /// Inspect and change the shopping cart
    Cart(cart::CartCommand),
}

/// Everything a command runs against.
#[derive(Debug)]
pub(crate) struct Context {
    pub(crate) catalog: Catalog,
    pub(crate) store: CartStore<FileStore, RecordingNotifier>,
    pub(crate) notifier: RecordingNotifier,
}

impl Context {
    /// Load the catalog and restore the cart from the data directory.
    pub(crate) fn open(cli: &Cli) -> Result<Self, CliError> {
        let catalog = match &cli.catalog {
            Some(path) => fixtures::load_catalog_file(path)?,
            None => Catalog::bundled()?,
        };

        let storage = FileStore::open(cli.data_dir.clone())?;
        let notifier = RecordingNotifier::new();

        let config = CartConfig {
            storage_key: cli.cart_key.clone(),
            ..CartConfig::default()
        };

        debug!(data_dir = %cli.data_dir.display(), "opened storefront data");

        Ok(Self {
            catalog,
            store: CartStore::with_config(storage, notifier.clone(), config),
            notifier,
        })
    }

    /// Write out notifications emitted since the last flush.
    fn flush_notifications(&self, out: &mut impl io::Write) -> Result<(), CliError> {
        for notification in self.notifier.drain() {
            writeln!(out, "{notification}")?;
        }

        Ok(())
    }
}

/// Run a parsed command, writing its output to `out`.
pub(crate) fn run(
    command: Commands,
    context: &mut Context,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    match command {
        Commands::Catalog(command) => catalog::run(command, &context.catalog, out),
        Commands::Cart(command) => {
            cart::run(command, context, out)?;
            context.flush_notifications(out)
        }
    }
}
