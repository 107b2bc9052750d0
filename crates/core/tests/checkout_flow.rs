//! Integration tests for the path from product record to invoice

use jiff::{Timestamp, tz::TimeZone};
use serde_json::json;
use testresult::TestResult;

use storefront::prelude::*;

fn lamp() -> TestResult<Product> {
    let mut product: Product = serde_json::from_value(json!({
        "name": "Brass Lamp",
        "price": 800,
        "salePrice": 650,
        "courierCharges": 80,
        "stockCount": 2,
        "images": ["lamp.jpg"],
        "sizes": [{ "name": "Large", "image": "lamp-large.jpg" }, "Small"],
    }))?;

    product.id = "lamp".to_string();

    Ok(product)
}

#[test]
fn file_backed_cart_checks_out_to_invoice() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = CartStore::new(FileStorage::new(dir.path()));
    let settings = StoreSettings {
        store_name: "Amilei".to_string(),
        whatsapp_number: "+91 90000 00001".to_string(),
        ..StoreSettings::default()
    };

    let product = lamp()?;

    store.add_to_cart(product.line_item(Some("Large"))?, 5)?;

    // Reopen the cart as a fresh session would.
    let reopened = CartStore::new(FileStorage::new(dir.path()));
    let cart = reopened.get_cart();

    assert_eq!(cart.len(), 1);
    assert_eq!(reopened.item_count(), 2);

    let breakdown = compute_breakdown(&cart, &settings.shipping())?;

    assert_eq!(breakdown.subtotal(), 1_300);
    assert_eq!(breakdown.shipping_total(), 160);
    assert_eq!(breakdown.amount_to_free_shipping(&settings.shipping()), Some(700));

    let created_at: Timestamp = "2026-05-10T08:30:00Z".parse()?;
    let order = OrderSnapshot::build(&cart, &breakdown, created_at)?;

    reopened.clear_cart()?;

    assert!(store.get_cart().is_empty());
    assert_eq!(order.grand_total(), 1_460);

    let handoff = Handoff::for_order(&order, &settings, "https://amilei.example");

    assert!(handoff.message.contains("Total: ₹1,460 (GST not included)"));
    assert!(handoff.url.starts_with("https://wa.me/919000000001?text="));

    let invoice = InvoiceData::from_order(
        &order,
        StoreIdentity::from(&settings),
        &settings.gst_message,
        &TimeZone::UTC,
    )?;

    let mut out = Vec::new();

    invoice.write_to(&mut out, &CurrencyFormatter::default())?;

    let text = String::from_utf8(out)?;

    assert!(text.contains("Brass Lamp (Large)"), "missing line in:\n{text}");
    assert!(text.contains("₹1,460"), "missing total in:\n{text}");
    assert_eq!(invoice.date, "10/05/2026");

    Ok(())
}

#[test]
fn sold_out_product_never_reaches_the_cart() -> TestResult {
    let store = CartStore::new(MemoryStorage::new());
    let product = Product {
        in_stock: false,
        ..lamp()?
    };

    let result = product.line_item(None);

    assert!(
        matches!(result, Err(ProductError::OutOfStock(_))),
        "expected OutOfStock, got {result:?}"
    );
    assert!(store.get_cart().is_empty());

    Ok(())
}

#[test]
fn order_from_empty_cart_is_rejected() {
    let store = CartStore::new(MemoryStorage::new());

    let result = create_order(&store.get_cart(), &PriceBreakdown::default());

    assert!(
        matches!(result, Err(OrderError::EmptyCart)),
        "expected EmptyCart, got {result:?}"
    );
}
