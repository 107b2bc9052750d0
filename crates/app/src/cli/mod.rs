use std::error::Error;

use clap::{Parser, Subcommand};
use storefront_app::{
    config::{LoggingConfig, StoreConfig},
    context::AppContext,
    observability,
};

mod cart;
mod checkout;
mod invoice;
mod order;
mod product;
mod settings;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Product(product::ProductCommand),
    Settings(settings::SettingsCommand),
    Cart(cart::CartCommand),
    Checkout,
    Order(order::OrderCommand),
    Invoice(invoice::InvoiceArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_subscriber(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let ctx = AppContext::from_config(&self.store)
            .map_err(|error| format!("failed to initialise storefront: {}", describe(&error)))?;

        match self.command {
            Commands::Product(command) => product::run(command, &ctx).await,
            Commands::Settings(command) => settings::run(command, &ctx).await,
            Commands::Cart(command) => cart::run(command, &ctx, &self.store.cart()).await,
            Commands::Checkout => checkout::run(&ctx, &self.store.cart()).await,
            Commands::Order(command) => order::run(command, &ctx).await,
            Commands::Invoice(args) => invoice::run(args, &ctx).await,
        }
    }
}

/// An error followed by each of its sources, `outer: inner: root`.
pub(crate) fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
