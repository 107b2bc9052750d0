//! Storefront
//!
//! Cart, pricing and order-total engine for a small storefront that checks out through a
//! WhatsApp handoff. The cart is persisted locally, totals are recomputed from it on every read,
//! and an order freezes both at checkout.

pub mod cart;
pub mod checkout;
pub mod currency;
pub mod invoice;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod settings;
