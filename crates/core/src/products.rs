//! Products

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::cart::{LineKey, NewCartItem};

/// Errors raised when turning a product into a cart line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// The product is marked out of stock or has no units left.
    #[error("Product out of stock")]
    OutOfStock(LineKey),

    /// The requested variant is not offered by the product.
    #[error("product {product_id} has no variant named {variant:?}")]
    UnknownVariant {
        /// Product key.
        product_id: String,

        /// Requested variant name.
        variant: String,
    },
}

/// A named sub-option of a product, such as a size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredVariant")]
pub struct Variant {
    /// Display name, also part of the cart line identity.
    pub name: String,

    /// Image specific to this variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Variants were historically stored either as bare names or as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredVariant {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        image: Option<String>,
    },
}

impl From<StoredVariant> for Variant {
    fn from(stored: StoredVariant) -> Self {
        match stored {
            StoredVariant::Name(name) => Variant { name, image: None },
            StoredVariant::Detailed { name, image } => Variant {
                name,
                image: image.filter(|image| !image.is_empty()),
            },
        }
    }
}

/// Product record as held by the remote product store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Storage key; not part of the stored document body.
    #[serde(skip)]
    pub id: String,

    /// Product name.
    pub name: String,

    /// Long description.
    #[serde(default)]
    pub description: String,

    /// Regular unit price.
    pub price: u64,

    /// Unit sale price. A stored zero means no sale.
    #[serde(
        default,
        deserialize_with = "zero_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<u64>,

    /// Per-unit shipping override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_charges: Option<u64>,

    /// Units in stock.
    #[serde(default)]
    pub stock_count: u32,

    /// Availability flag maintained alongside `stock_count`.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    /// Gallery images, primary first.
    #[serde(default)]
    pub images: Vec<String>,

    /// Legacy single image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Selectable variants.
    #[serde(default)]
    pub sizes: Vec<Variant>,

    /// Featured on the home page.
    #[serde(default)]
    pub is_featured: bool,
}

fn default_in_stock() -> bool {
    true
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.filter(|price| *price > 0))
}

impl Product {
    /// Price paid per unit.
    pub fn effective_price(&self) -> u64 {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whole-number discount of the sale price against the regular price.
    pub fn discount_percent(&self) -> u32 {
        let Some(sale_price) = self.sale_price.filter(|sale| *sale < self.price) else {
            return 0;
        };

        let price = u128::from(self.price);
        let saving = price - u128::from(sale_price);

        u32::try_from((saving * 100 + price / 2) / price).unwrap_or(100)
    }

    /// First gallery image, falling back to the legacy image field.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or(self.image_url.as_deref())
    }

    /// Whether units can be added to a cart.
    pub fn is_available(&self) -> bool {
        self.in_stock && self.stock_count > 0
    }

    /// Look up a variant by name.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.sizes.iter().find(|variant| variant.name == name)
    }

    /// Snapshot this product as a cart line, optionally with a variant selected.
    ///
    /// # Errors
    ///
    /// - [`ProductError::UnknownVariant`]: the variant is not offered.
    /// - [`ProductError::OutOfStock`]: nothing is left to sell.
    pub fn line_item(&self, variant: Option<&str>) -> Result<NewCartItem, ProductError> {
        let variant = variant
            .map(|name| {
                self.variant(name)
                    .ok_or_else(|| ProductError::UnknownVariant {
                        product_id: self.id.clone(),
                        variant: name.to_string(),
                    })
            })
            .transpose()?;

        let item = NewCartItem {
            product_id: self.id.clone(),
            selected_size: variant.map(|variant| variant.name.clone()),
            name: self.name.clone(),
            image_url: variant
                .and_then(|variant| variant.image.as_deref())
                .or_else(|| self.primary_image())
                .unwrap_or_default()
                .to_string(),
            price: self.price,
            sale_price: self.sale_price,
            courier_charges: self.courier_charges,
            stock_count: self.stock_count,
        };

        if !self.is_available() {
            return Err(ProductError::OutOfStock(item.key()));
        }

        Ok(item)
    }
}
