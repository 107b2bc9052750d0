//! Pricing
//!
//! Totals are derived from the cart on every read and never stored on the cart itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An amount does not fit in the integer range.
    #[error("amount overflow while pricing cart")]
    Overflow,
}

/// Store-wide shipping rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingConfig {
    /// Per-unit charge for lines without their own override.
    pub default_charge: u64,

    /// Subtotal at or above which shipping is free. Zero makes shipping always free.
    pub free_shipping_threshold: u64,

    /// Tax disclaimer shown next to totals. Not used in any computation.
    pub tax_disclaimer: String,
}

/// Shipping charged for one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLine {
    /// Name of the line's product.
    pub product_name: String,

    /// Charge for the whole line (per-unit charge times quantity).
    pub charge: u64,
}

/// Price breakdown of a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    subtotal: u64,
    shipping_total: u64,
    shipping_lines: Vec<ShippingLine>,
    grand_total: u64,
}

impl PriceBreakdown {
    /// Sum of effective unit price times quantity over all lines.
    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    /// Aggregate shipping charge; zero when the subtotal reached the free-shipping threshold.
    pub fn shipping_total(&self) -> u64 {
        self.shipping_total
    }

    /// Per-line shipping charges in cart order; empty when shipping is free.
    pub fn shipping_lines(&self) -> &[ShippingLine] {
        &self.shipping_lines
    }

    /// `subtotal + shipping_total`.
    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    /// Whether no shipping is charged.
    pub fn is_free_shipping(&self) -> bool {
        self.shipping_total == 0
    }

    /// How much more the subtotal needs to reach the free-shipping threshold.
    pub fn amount_to_free_shipping(&self, config: &ShippingConfig) -> Option<u64> {
        config
            .free_shipping_threshold
            .checked_sub(self.subtotal)
            .filter(|remaining| *remaining > 0)
    }
}

/// Compute the price breakdown of a cart.
///
/// The free-shipping threshold is checked against the aggregate subtotal: once it is reached,
/// no line is charged shipping, whatever its own override says.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: an intermediate amount overflowed.
pub fn compute_breakdown(
    cart: &[CartItem],
    config: &ShippingConfig,
) -> Result<PriceBreakdown, PricingError> {
    let subtotal = cart.iter().try_fold(0_u64, |acc, item| {
        item.line_total()
            .and_then(|total| acc.checked_add(total))
            .ok_or(PricingError::Overflow)
    })?;

    if subtotal >= config.free_shipping_threshold {
        return Ok(PriceBreakdown {
            subtotal,
            shipping_total: 0,
            shipping_lines: Vec::new(),
            grand_total: subtotal,
        });
    }

    let mut shipping_total = 0_u64;
    let mut shipping_lines = Vec::with_capacity(cart.len());

    for item in cart {
        let charge = item
            .courier_charges
            .unwrap_or(config.default_charge)
            .checked_mul(u64::from(item.quantity))
            .ok_or(PricingError::Overflow)?;

        shipping_total = shipping_total
            .checked_add(charge)
            .ok_or(PricingError::Overflow)?;

        shipping_lines.push(ShippingLine {
            product_name: item.name.clone(),
            charge,
        });
    }

    if shipping_total == 0 {
        shipping_lines.clear();
    }

    let grand_total = subtotal
        .checked_add(shipping_total)
        .ok_or(PricingError::Overflow)?;

    Ok(PriceBreakdown {
        subtotal,
        shipping_total,
        shipping_lines,
        grand_total,
    })
}
