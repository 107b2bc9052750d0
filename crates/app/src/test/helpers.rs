//! Test Helpers

use storefront::cart::{CartItem, NewCartItem};

pub(crate) fn new_cart_item(product_id: &str, price: u64, stock_count: u32) -> NewCartItem {
    NewCartItem {
        product_id: product_id.to_string(),
        selected_size: None,
        name: product_id.to_string(),
        image_url: String::new(),
        price,
        sale_price: None,
        courier_charges: None,
        stock_count,
    }
}

pub(crate) fn cart_item(product_id: &str, price: u64, quantity: u32) -> CartItem {
    CartItem {
        product_id: product_id.to_string(),
        selected_size: None,
        name: product_id.to_string(),
        image_url: String::new(),
        price,
        sale_price: None,
        courier_charges: None,
        stock_count: quantity.max(10),
        quantity,
    }
}
