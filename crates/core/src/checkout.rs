//! Checkout handoff
//!
//! Checkout ends by handing a pre-formatted message to a WhatsApp deep link. Delivery is not
//! confirmed.

use serde::Serialize;

use crate::{currency::CurrencyFormatter, orders::OrderSnapshot, settings::StoreSettings};

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Message and deep link for one placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    /// Plain-text message.
    pub message: String,

    /// `https://wa.me/<number>?text=<message>`.
    pub url: String,
}

impl Handoff {
    /// Build the handoff for `order` using the store's name, number and disclaimer.
    pub fn for_order(order: &OrderSnapshot, settings: &StoreSettings, base_url: &str) -> Self {
        let message = handoff_message(
            order,
            &settings.store_name,
            base_url,
            &settings.gst_message,
            &CurrencyFormatter::default(),
        );

        let url = whatsapp_link(&settings.whatsapp_number, &message);

        Self { message, url }
    }
}

/// Public page of an order.
pub fn order_url(base_url: &str, order_id: &str) -> String {
    format!("{}/order/{order_id}", base_url.trim_end_matches('/'))
}

/// Message sent to the store owner for a placed order.
pub fn handoff_message(
    order: &OrderSnapshot,
    store_name: &str,
    base_url: &str,
    disclaimer: &str,
    formatter: &CurrencyFormatter,
) -> String {
    let order_id = order.order_id().as_str();

    format!(
        "Hi! I'd like to place an order from {store_name}:\n\n\
         Order ID: {order_id}\n\
         Order Details: {}\n\n\
         Total: {} ({disclaimer})\n\n\
         Please confirm availability!",
        order_url(base_url, order_id),
        formatter.format(order.grand_total()),
    )
}

/// WhatsApp deep link opening a chat with `number` prefilled with `message`.
///
/// Everything but digits is stripped from the number.
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();

    format!(
        "{WHATSAPP_BASE_URL}/{digits}?text={}",
        urlencoding::encode(message)
    )
}
