//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use shophub::persistence::CART_STORAGE_KEY;

use crate::commands::Commands;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub(crate) log_format: LogFormat,
}

/// ShopHub storefront CLI
#[derive(Debug, Parser)]
#[command(name = "shophub", about = "ShopHub storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding persisted storefront state
    #[arg(long, env = "SHOPHUB_DATA_DIR", default_value = ".shophub", global = true)]
    pub(crate) data_dir: PathBuf,

    /// Catalog fixture to load instead of the bundled catalog
    #[arg(long, env = "SHOPHUB_CATALOG", global = true)]
    pub(crate) catalog: Option<PathBuf>,

    /// Storage key the cart is persisted under
    #[arg(long, env = "SHOPHUB_CART_KEY", default_value = CART_STORAGE_KEY, global = true)]
    pub(crate) cart_key: String,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

impl Cli {
    /// Load configuration from `.env`, environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
