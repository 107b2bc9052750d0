use jiff::Timestamp;
use storefront::currency::format_amount;
use storefront_app::context::AppContext;

use crate::cli::describe;

pub(super) async fn run(order_id: &str, ctx: &AppContext) -> Result<(), String> {
    let stored = ctx
        .orders
        .find_order(order_id)
        .await
        .map_err(|error| format!("failed to load order {order_id}: {}", describe(&error)))?;

    let order = &stored.order;

    println!("order_id: {}", order.order_id());
    println!("status: {}", order.status().label());
    println!("created_at: {}", order.created_at());
    println!("last_updated: {}", order.last_updated());

    if order.is_expired(Timestamp::now()) {
        println!("expired_at: {}", order.expires_at());
    } else {
        println!("expires_at: {}", order.expires_at());
    }

    println!();

    for item in order.items() {
        let total = item
            .line_total()
            .map_or_else(|| "-".to_string(), format_amount);

        println!(
            "{} x {} @ {} = {total}",
            item.quantity,
            item.key(),
            format_amount(item.effective_price())
        );
    }

    println!();
    println!("subtotal: {}", format_amount(order.subtotal()));

    for line in order.shipping_lines() {
        println!("  {}: {}", line.product_name, format_amount(line.charge));
    }

    println!("courier_charges: {}", format_amount(order.shipping_total()));
    println!("total: {}", format_amount(order.grand_total()));
    println!(
        "invoice_generated_at: {}",
        order
            .invoice_generated_at()
            .map_or_else(|| "never".to_string(), |value| value.to_string())
    );
    println!(
        "stock_reduced_at: {}",
        order
            .stock_reduced_at()
            .map_or_else(|| "never".to_string(), |value| value.to_string())
    );

    if !order.admin_notes().is_empty() {
        println!();
        println!("{}", order.admin_notes());
    }

    Ok(())
}
