use std::path::PathBuf;

use clap::{Args, Subcommand};
use storefront::{currency::format_amount, products::Product};
use storefront_app::context::AppContext;

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Create or replace a product from a YAML file
    Put(PutProductArgs),

    /// Show one product
    Show(ShowProductArgs),

    /// List all products
    List,
}

#[derive(Debug, Args)]
struct PutProductArgs {
    /// Product id
    id: String,

    /// YAML file with the product fields
    file: PathBuf,
}

#[derive(Debug, Args)]
struct ShowProductArgs {
    /// Product id
    id: String,
}

pub(crate) async fn run(command: ProductCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Put(args) => put(args, ctx).await,
        ProductSubcommand::Show(args) => show(args, ctx).await,
        ProductSubcommand::List => list(ctx).await,
    }
}

async fn put(args: PutProductArgs, ctx: &AppContext) -> Result<(), String> {
    let yaml = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let mut product: Product = serde_norway::from_str(&yaml)
        .map_err(|error| format!("failed to parse {}: {error}", args.file.display()))?;

    product.id = args.id;

    let product = ctx
        .products
        .put_product(product)
        .await
        .map_err(|error| format!("failed to save product: {}", describe(&error)))?;

    println!("saved product {}", product.id);

    Ok(())
}

async fn show(args: ShowProductArgs, ctx: &AppContext) -> Result<(), String> {
    let product = ctx
        .products
        .get_product(&args.id)
        .await
        .map_err(|error| format!("failed to load product {}: {}", args.id, describe(&error)))?;

    println!("id: {}", product.id);
    println!("name: {}", product.name);
    println!("price: {}", format_amount(product.price));

    if let Some(sale_price) = product.sale_price {
        println!(
            "sale_price: {} ({}% off)",
            format_amount(sale_price),
            product.discount_percent()
        );
    }

    println!("stock: {}", product.stock_count);
    println!("available: {}", product.is_available());
    println!("image: {}", product.primary_image().unwrap_or("none"));

    for variant in &product.sizes {
        println!("variant: {}", variant.name);
    }

    Ok(())
}

async fn list(ctx: &AppContext) -> Result<(), String> {
    let products = ctx
        .products
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {}", describe(&error)))?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    for product in products {
        let status = if product.is_available() {
            format!("{} in stock", product.stock_count)
        } else {
            "out of stock".to_string()
        };

        println!(
            "{}\t{}\t{}\t{status}",
            product.id,
            product.name,
            format_amount(product.effective_price())
        );
    }

    Ok(())
}
