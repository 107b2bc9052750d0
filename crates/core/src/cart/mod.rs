//! Cart
//!
//! The cart is a list of denormalized line items: name, image and prices are copied from the
//! product when it is added and are never re-fetched, so a later price change does not reach
//! a cart that already holds the product. Quantities are clamped to the stock snapshot taken
//! at the last add.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

mod events;
mod storage;

pub use events::CartEvent;
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "amilei_cart";

/// Lines with fewer units than this in stock carry a low-stock notice.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Errors related to cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product has no stock left, so nothing can be added.
    #[error("Product out of stock")]
    OutOfStock(LineKey),

    /// A quantity of zero was requested for an add.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// The requested quantity exceeds the stock snapshot.
    #[error("Only {available} items available in stock")]
    InsufficientStock {
        /// Line the request was made for.
        key: LineKey,

        /// Units available according to the stock snapshot.
        available: u32,
    },

    /// No line matches the key.
    #[error("{0} is not in the cart")]
    NotInCart(LineKey),

    /// The cart could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Identity of a cart line: a product plus the selected variant, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product key in the remote product store.
    pub product_id: String,

    /// Selected variant name; `None` is the default variant.
    pub variant: Option<String>,
}

impl LineKey {
    /// Key for a product without a selected variant.
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant: None,
        }
    }

    /// Key for a product with the given variant selected.
    pub fn with_variant(product_id: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant: Some(variant.into()),
        }
    }
}

impl Display for LineKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{} ({variant})", self.product_id),
            None => write!(f, "{}", self.product_id),
        }
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product key in the remote product store.
    pub product_id: String,

    /// Selected variant name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,

    /// Product name at the time of adding.
    pub name: String,

    /// Image shown for the line.
    #[serde(default)]
    pub image_url: String,

    /// Regular unit price.
    pub price: u64,

    /// Unit sale price; takes precedence over `price` when present and above zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<u64>,

    /// Per-unit shipping charge; the store default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_charges: Option<u64>,

    /// Stock snapshot used as the quantity ceiling.
    pub stock_count: u32,

    /// Units of this line, always between 1 and `stock_count`.
    pub quantity: u32,
}

impl CartItem {
    /// Identity of this line.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            variant: self.selected_size.clone(),
        }
    }

    /// Price paid per unit. A zero sale price counts as no sale.
    pub fn effective_price(&self) -> u64 {
        self.sale_price
            .filter(|sale_price| *sale_price > 0)
            .unwrap_or(self.price)
    }

    /// Price paid for the whole line, or `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.effective_price().checked_mul(u64::from(self.quantity))
    }

    /// `"Only N left in stock"` when stock is running low.
    pub fn low_stock_notice(&self) -> Option<String> {
        (self.stock_count < LOW_STOCK_THRESHOLD)
            .then(|| format!("Only {} left in stock", self.stock_count))
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.selected_size == key.variant
    }
}

/// A product snapshot about to be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Product key in the remote product store.
    pub product_id: String,

    /// Selected variant name.
    pub selected_size: Option<String>,

    /// Product name.
    pub name: String,

    /// Image shown for the line.
    pub image_url: String,

    /// Regular unit price.
    pub price: u64,

    /// Unit sale price.
    pub sale_price: Option<u64>,

    /// Per-unit shipping charge override.
    pub courier_charges: Option<u64>,

    /// Current stock of the product.
    pub stock_count: u32,
}

impl NewCartItem {
    /// Identity of the line this item would occupy.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            variant: self.selected_size.clone(),
        }
    }

    fn into_line(self, quantity: u32) -> CartItem {
        CartItem {
            product_id: self.product_id,
            selected_size: self.selected_size,
            name: self.name,
            image_url: self.image_url,
            price: self.price,
            sale_price: self.sale_price,
            courier_charges: self.courier_charges,
            stock_count: self.stock_count,
            quantity,
        }
    }
}

/// Sole mutator of the persisted cart.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    storage: S,
    key: String,
    events: broadcast::Sender<CartEvent>,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store persisting under [`CART_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Create a store persisting under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            events: events::channel(),
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Current cart; empty when nothing is persisted.
    ///
    /// An unreadable or corrupt blob is logged and treated as an empty cart.
    pub fn get_cart(&self) -> Vec<CartItem> {
        let blob = match self.storage.load(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!(key = %self.key, %error, "failed to read cart, treating as empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&blob).unwrap_or_else(|error| {
            warn!(key = %self.key, %error, "corrupt cart blob, treating as empty");
            Vec::new()
        })
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.get_cart()
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Add `quantity` units of a product, merging with an existing line for the same key.
    ///
    /// The resulting quantity is clamped to the item's stock snapshot, which also refreshes
    /// the snapshot stored on an existing line. Returns the line as persisted.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` was zero.
    /// - [`CartError::OutOfStock`]: the item has no stock.
    /// - [`CartError::Storage`], [`CartError::Serialize`]: the cart could not be persisted.
    pub fn add_to_cart(&self, item: NewCartItem, quantity: u32) -> Result<CartItem, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if item.stock_count == 0 {
            return Err(CartError::OutOfStock(item.key()));
        }

        let key = item.key();
        let mut cart = self.get_cart();

        let line = if let Some(existing) = cart.iter_mut().find(|line| line.matches(&key)) {
            existing.quantity = existing
                .quantity
                .saturating_add(quantity)
                .min(item.stock_count);
            existing.stock_count = item.stock_count;

            existing.clone()
        } else {
            let quantity = quantity.min(item.stock_count);
            let line = item.into_line(quantity);
            cart.push(line.clone());

            line
        };

        self.save(&cart)?;

        Ok(line)
    }

    /// Check a requested quantity against the stored stock snapshot without changing anything.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInCart`]: no line matches `key`.
    /// - [`CartError::InsufficientStock`]: `requested` exceeds the stock snapshot.
    pub fn check_quantity(&self, key: &LineKey, requested: u32) -> Result<(), CartError> {
        let cart = self.get_cart();

        let line = cart
            .iter()
            .find(|line| line.matches(key))
            .ok_or_else(|| CartError::NotInCart(key.clone()))?;

        if requested > line.stock_count {
            return Err(CartError::InsufficientStock {
                key: key.clone(),
                available: line.stock_count,
            });
        }

        Ok(())
    }

    /// Set a line's quantity, silently clamped to its stock snapshot.
    ///
    /// A quantity of zero or below removes the line. A missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart could not be persisted.
    pub fn update_quantity(&self, key: &LineKey, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_from_cart(key);
        }

        let mut cart = self.get_cart();

        let Some(line) = cart.iter_mut().find(|line| line.matches(key)) else {
            return Ok(());
        };

        let clamped = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(line.stock_count);

        if clamped == 0 {
            return self.remove_from_cart(key);
        }

        line.quantity = clamped;

        self.save(&cart)
    }

    /// Remove the matching line. A missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart could not be persisted.
    pub fn remove_from_cart(&self, key: &LineKey) -> Result<(), CartError> {
        let mut cart = self.get_cart();
        let before = cart.len();

        cart.retain(|line| !line.matches(key));

        if cart.len() == before {
            return Ok(());
        }

        self.save(&cart)
    }

    /// Delete the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the storage could not be written.
    pub fn clear_cart(&self) -> Result<(), CartError> {
        self.storage.remove(&self.key)?;

        events::notify(&self.events, CartEvent::Cleared);

        Ok(())
    }

    fn save(&self, cart: &[CartItem]) -> Result<(), CartError> {
        let blob = serde_json::to_string(cart)?;

        self.storage.save(&self.key, &blob)?;

        events::notify(&self.events, CartEvent::Updated);

        Ok(())
    }
}
