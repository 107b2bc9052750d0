use clap::{Args, Subcommand};
use storefront::cart::{CartError, CartItem, CartStorage, CartStore, LineKey};
use storefront_app::context::AppContext;
use tracing::warn;

use super::describe;

mod show;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a product to the cart
    Add(AddArgs),

    /// Set the quantity of a cart line; zero or less removes it
    Update(UpdateArgs),

    /// Remove a cart line
    Remove(LineArgs),

    /// Show cart lines and totals
    Show,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Product id
    product_id: String,

    /// Selected variant
    #[arg(long)]
    size: Option<String>,
}

impl LineArgs {
    fn key(&self) -> LineKey {
        match &self.size {
            Some(size) => LineKey::with_variant(&self.product_id, size),
            None => LineKey::new(&self.product_id),
        }
    }
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(flatten)]
    line: LineArgs,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(flatten)]
    line: LineArgs,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) async fn run<S: CartStorage>(
    command: CartCommand,
    ctx: &AppContext,
    cart: &CartStore<S>,
) -> Result<(), String> {
    match command.command {
        CartSubcommand::Add(args) => add(args, ctx, cart).await,
        CartSubcommand::Update(args) => update(&args, cart),
        CartSubcommand::Remove(args) => {
            let key = args.key();

            cart.remove_from_cart(&key)
                .map_err(|error| format!("failed to remove {key}: {}", describe(&error)))
        }
        CartSubcommand::Show => show::run(ctx, cart).await,
        CartSubcommand::Clear => {
            cart.clear_cart()
                .map_err(|error| format!("failed to clear cart: {}", describe(&error)))?;

            println!("cart cleared");

            Ok(())
        }
    }
}

async fn add<S: CartStorage>(
    args: AddArgs,
    ctx: &AppContext,
    cart: &CartStore<S>,
) -> Result<(), String> {
    let product = ctx
        .products
        .get_product(&args.line.product_id)
        .await
        .map_err(|error| {
            format!("failed to load product {}: {}", args.line.product_id, describe(&error))
        })?;

    let item = product
        .line_item(args.line.size.as_deref())
        .map_err(|error| error.to_string())?;

    let key = item.key();
    let existing = cart
        .get_cart()
        .iter()
        .find(|line| line.key() == key)
        .map_or(0, |line| line.quantity);

    let line = cart
        .add_to_cart(item, args.quantity)
        .map_err(|error| describe(&error))?;

    if let Some(notice) = clamp_notice(existing, args.quantity, &line) {
        println!("{notice}");
    }

    println!("{} x {} in cart", line.quantity, line.key());

    if let Some(notice) = line.low_stock_notice() {
        println!("{notice}");
    }

    Ok(())
}

/// Notice shown when `line` ended up with fewer units than it held plus those requested.
fn clamp_notice(existing: u32, requested: u32, line: &CartItem) -> Option<String> {
    (line.quantity < existing.saturating_add(requested))
        .then(|| format!("Only {} items available in stock", line.stock_count))
}

fn update<S: CartStorage>(args: &UpdateArgs, cart: &CartStore<S>) -> Result<(), String> {
    let key = args.line.key();

    if args.quantity > 0 {
        let requested = u32::try_from(args.quantity).unwrap_or(u32::MAX);

        match cart.check_quantity(&key, requested) {
            Ok(()) => {}
            Err(error @ CartError::InsufficientStock { .. }) => println!("{error}"),
            Err(CartError::NotInCart(key)) => {
                warn!(%key, "update ignored, line not in cart");
                return Err(format!("{key} is not in the cart"));
            }
            Err(error) => return Err(describe(&error)),
        }
    }

    cart.update_quantity(&key, args.quantity)
        .map_err(|error| format!("failed to update {key}: {}", describe(&error)))
}
