//! Storefront configuration

use std::path::PathBuf;

use clap::Args;
use jiff::tz::TimeZone;
use storefront::cart::{CART_STORAGE_KEY, CartStore, FileStorage};
use thiserror::Error;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown time zone {name:?}")]
    TimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },
}

/// Where the storefront keeps its data and how it presents it.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Directory holding products, orders and settings documents
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Directory holding the local cart
    #[arg(long, env = "STOREFRONT_CART_DIR", default_value = "cart", global = true)]
    pub cart_dir: PathBuf,

    /// Cart storage key
    #[arg(long, env = "STOREFRONT_CART_KEY", default_value = CART_STORAGE_KEY, global = true)]
    pub cart_key: String,

    /// Public site URL used in order links
    #[arg(
        long,
        env = "STOREFRONT_BASE_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    pub base_url: String,

    /// IANA time zone for invoice dates, or UTC
    #[arg(long, env = "STOREFRONT_TZ", default_value = "UTC", global = true)]
    pub time_zone: String,
}

impl StoreConfig {
    /// Resolve the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is not in the system time zone database.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        if self.time_zone.eq_ignore_ascii_case("utc") {
            return Ok(TimeZone::UTC);
        }

        TimeZone::get(&self.time_zone).map_err(|source| ConfigError::TimeZone {
            name: self.time_zone.clone(),
            source,
        })
    }

    /// The local cart, persisted under [`StoreConfig::cart_dir`].
    #[must_use]
    pub fn cart(&self) -> CartStore<FileStorage> {
        CartStore::with_key(FileStorage::new(&self.cart_dir), &self.cart_key)
    }
}
