//! Sample Invoice Example
//!
//! Fills a cart with a few products, checks it out and prints the invoice.
//!
//! Use `-s` to load store settings from a YAML file

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use jiff::{Timestamp, tz::TimeZone};

use storefront::prelude::*;

/// Sample Invoice Example
#[derive(Debug, Parser)]
struct Args {
    /// Store settings YAML file
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn item(id: &str, price: u64, sale_price: Option<u64>, stock_count: u32) -> NewCartItem {
    NewCartItem {
        product_id: id.to_lowercase().replace(' ', "-"),
        selected_size: None,
        name: id.to_string(),
        image_url: String::new(),
        price,
        sale_price,
        courier_charges: None,
        stock_count,
    }
}

/// Sample Invoice Example
pub fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match args.settings {
        Some(path) => StoreSettings::from_yaml_file(path)?,
        None => StoreSettings {
            store_name: "Sample Store".to_string(),
            ..StoreSettings::default()
        },
    };

    let cart = CartStore::new(MemoryStorage::new());

    cart.add_to_cart(item("Brass Lamp", 1_200, Some(950), 4), 1)?;
    cart.add_to_cart(item("Cotton Throw", 650, None, 12), 2)?;

    let breakdown = compute_breakdown(&cart.get_cart(), &settings.shipping())?;
    let order = OrderSnapshot::build(&cart.get_cart(), &breakdown, Timestamp::now())?;

    let invoice = InvoiceData::from_order(
        &order,
        StoreIdentity::from(&settings),
        &settings.gst_message,
        &TimeZone::system(),
    )?;

    invoice.write_to(io::stdout().lock(), &CurrencyFormatter::default())?;

    Ok(())
}
