use storefront::{
    cart::{CartStorage, CartStore},
    currency::CurrencyFormatter,
    pricing::compute_breakdown,
};
use storefront_app::context::AppContext;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::cli::describe;

pub(super) async fn run<S: CartStorage>(
    ctx: &AppContext,
    cart: &CartStore<S>,
) -> Result<(), String> {
    let items = cart.get_cart();

    if items.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }

    let settings = ctx
        .settings
        .store_settings()
        .await
        .map_err(|error| format!("failed to load settings: {}", describe(&error)))?;

    let shipping = settings.shipping();
    let breakdown = compute_breakdown(&items, &shipping).map_err(|error| error.to_string())?;
    let formatter = CurrencyFormatter::default();

    let mut builder = Builder::default();

    builder.push_record(["Product", "Qty", "Price", "Total"]);

    for item in &items {
        builder.push_record([
            item.key().to_string(),
            item.quantity.to_string(),
            formatter.format(item.effective_price()),
            item.line_total()
                .map_or_else(|| "-".to_string(), |total| formatter.format(total)),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..4), Alignment::right());

    println!("{table}");

    for item in &items {
        if let Some(notice) = item.low_stock_notice() {
            println!("{}: {notice}", item.name);
        }
    }

    println!("Items: {}", cart.item_count());
    println!("Subtotal: {}", formatter.format(breakdown.subtotal()));

    if breakdown.is_free_shipping() {
        println!("Courier & Packaging: FREE");
    } else {
        for line in breakdown.shipping_lines() {
            println!(
                "  {}: {}",
                line.product_name,
                formatter.format(line.charge)
            );
        }

        println!(
            "Courier & Packaging: {}",
            formatter.format(breakdown.shipping_total())
        );
    }

    println!("Total: {}", formatter.format(breakdown.grand_total()));
    println!("* {}", shipping.tax_disclaimer);

    if let Some(remaining) = breakdown.amount_to_free_shipping(&shipping) {
        println!(
            "Add {} more for free shipping",
            formatter.format(remaining)
        );
    }

    Ok(())
}
