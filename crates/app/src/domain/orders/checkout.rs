//! Checkout: turn the local cart into a persisted order.

use storefront::cart::{CartError, CartStorage, CartStore};
use thiserror::Error;
use tracing::error;

use crate::domain::orders::{OrdersService, OrdersServiceError, PlacedOrder};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("failed to place order")]
    PlaceOrder(#[from] OrdersServiceError),

    #[error("order {order_id} was placed but the cart could not be cleared")]
    ClearCart {
        order_id: String,
        #[source]
        source: CartError,
    },
}

/// Place an order for the current cart, then clear the cart.
///
/// The cart is cleared only once the order has been persisted; a failed placement leaves it
/// untouched.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: there is nothing to order.
/// - [`CheckoutError::PlaceOrder`]: pricing or persisting the order failed.
/// - [`CheckoutError::ClearCart`]: the order exists but the cart still holds its lines.
pub async fn checkout<S: CartStorage>(
    orders: &dyn OrdersService,
    cart: &CartStore<S>,
) -> Result<PlacedOrder, CheckoutError> {
    let items = cart.get_cart();

    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let placed = orders
        .place_order(items)
        .await
        .inspect_err(|error| error!(%error, "checkout failed, cart kept"))?;

    cart.clear_cart().map_err(|source| CheckoutError::ClearCart {
        order_id: placed.order.order_id().to_string(),
        source,
    })?;

    Ok(placed)
}

#[cfg(test)]
mod tests {
    use storefront::{
        cart::{CartItem, MemoryStorage},
        checkout::Handoff,
        orders::OrderSnapshot,
        pricing::{ShippingConfig, compute_breakdown},
    };
    use testresult::TestResult;

    use crate::{
        documents::DocumentError,
        domain::orders::MockOrdersService,
        test::{cart_item, new_cart_item},
    };

    use super::*;

    fn cart_with_lamp() -> TestResult<CartStore<MemoryStorage>> {
        let cart = CartStore::new(MemoryStorage::new());

        cart.add_to_cart(new_cart_item("lamp", 500, 10), 2)?;

        Ok(cart)
    }

    fn placed(items: &[CartItem]) -> TestResult<PlacedOrder> {
        let config = ShippingConfig {
            default_charge: 100,
            free_shipping_threshold: 2_000,
            tax_disclaimer: "GST not included".to_string(),
        };

        let breakdown = compute_breakdown(items, &config)?;
        let order = OrderSnapshot::build(items, &breakdown, jiff::Timestamp::UNIX_EPOCH)?;

        Ok(PlacedOrder {
            key: "key".to_string(),
            order,
            handoff: Handoff {
                message: String::new(),
                url: String::new(),
            },
        })
    }

    #[tokio::test]
    async fn successful_checkout_clears_cart() -> TestResult {
        let cart = cart_with_lamp()?;
        let expected = placed(&[cart_item("lamp", 500, 2)])?;
        let returned = expected.clone();

        let mut orders = MockOrdersService::new();
        orders
            .expect_place_order()
            .withf(|items| items.len() == 1)
            .times(1)
            .returning(move |_items| Ok(returned.clone()));

        let result = checkout(&orders, &cart).await?;

        assert_eq!(result, expected);
        assert!(cart.get_cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_placement_keeps_cart() -> TestResult {
        let cart = cart_with_lamp()?;

        let mut orders = MockOrdersService::new();
        orders.expect_place_order().times(1).returning(|_items| {
            Err(OrdersServiceError::Document(DocumentError::NotAnObject))
        });

        let result = checkout(&orders, &cart).await;

        assert!(
            matches!(result, Err(CheckoutError::PlaceOrder(_))),
            "expected PlaceOrder, got {result:?}"
        );
        assert_eq!(cart.get_cart().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_never_reaches_the_store() {
        let cart = CartStore::new(MemoryStorage::new());
        let orders = MockOrdersService::new();

        let result = checkout(&orders, &cart).await;

        assert!(
            matches!(result, Err(CheckoutError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }
}
