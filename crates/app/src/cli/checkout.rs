use storefront::{
    cart::{CartStorage, CartStore},
    currency::format_amount,
};
use storefront_app::{
    context::AppContext,
    domain::orders::{CheckoutError, checkout},
};

use super::describe;

pub(crate) async fn run<S: CartStorage>(
    ctx: &AppContext,
    cart: &CartStore<S>,
) -> Result<(), String> {
    let placed = match checkout(ctx.orders.as_ref(), cart).await {
        Ok(placed) => placed,
        Err(CheckoutError::EmptyCart) => return Err("Your cart is empty".to_string()),
        Err(error) => return Err(describe(&error)),
    };

    println!("order_id: {}", placed.order.order_id());
    println!("total: {}", format_amount(placed.order.grand_total()));
    println!("whatsapp: {}", placed.handoff.url);
    println!();
    println!("{}", placed.handoff.message);

    Ok(())
}
