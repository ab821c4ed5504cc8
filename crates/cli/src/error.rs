//! CLI errors

use std::io;

use shophub::{
    fixtures::FixtureError, persistence::PersistenceError, pricing::PricingError,
    receipt::ReceiptError, storage::StorageError,
};
use thiserror::Error;

/// Errors surfaced to the shell by the `shophub` binary.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The catalog fixture could not be loaded.
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] FixtureError),

    /// The data directory could not be opened.
    #[error("failed to open data directory: {0}")]
    Storage(#[from] StorageError),

    /// The cart was changed but could not be saved.
    #[error("cart could not be saved: {0}")]
    Persistence(#[from] PersistenceError),

    /// A price could not be formatted.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The cart summary could not be rendered.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// No product has the requested id.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The product cannot be ordered right now.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}
