//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CART_STORAGE_KEY, CartError, CartEvent, CartItem, CartStorage, CartStore, FileStorage,
        LineKey, MemoryStorage, NewCartItem, StorageError,
    },
    checkout::{Handoff, handoff_message, order_url, whatsapp_link},
    currency::{CurrencyFormatter, format_amount},
    invoice::{InvoiceData, InvoiceError, InvoiceLine, StoreIdentity},
    orders::{
        OrderError, OrderId, OrderSnapshot, OrderStats, OrderStatus, create_order, filter_orders,
    },
    pricing::{PriceBreakdown, PricingError, ShippingConfig, ShippingLine, compute_breakdown},
    products::{Product, ProductError, Variant},
    settings::{SettingsError, StoreSettings},
};
