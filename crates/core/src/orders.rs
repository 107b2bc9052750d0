//! Orders
//!
//! An order freezes the cart and its price breakdown at checkout. Totals are copied by value
//! and never recomputed, so later changes to settings or product prices do not reach it.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartItem,
    pricing::{PriceBreakdown, ShippingLine},
};

/// Hours an order stays open before it expires.
const ORDER_LIFETIME_HOURS: i64 = 30 * 24;

/// Errors raised while building or updating an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout was attempted with no lines.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A status string did not name a known status.
    #[error("unknown order status: {0:?}")]
    UnknownStatus(String),

    /// An admin note had no content.
    #[error("note must not be blank")]
    BlankNote,

    /// A timestamp computation left the supported range.
    #[error(transparent)]
    Timestamp(#[from] jiff::Error),
}

/// Human-readable order identifier, distinct from the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Identifier derived from the creation time: `ORD-<epoch millis>`.
    ///
    /// Two orders created in the same millisecond share an id.
    pub fn from_timestamp(at: Timestamp) -> Self {
        Self(format!("ORD-{}", at.as_millisecond()))
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order lifecycle status, managed by the store owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting contact.
    #[default]
    Pending,

    /// Customer has been contacted.
    Contacted,

    /// Availability and payment confirmed.
    Confirmed,

    /// Delivered.
    Completed,

    /// Abandoned or rejected.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Contacted,
        OrderStatus::Confirmed,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Contacted => "contacted",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Capitalized label for display.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Contacted => "Contacted",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();

        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| OrderError::UnknownStatus(s.to_string()))
    }
}

/// Order record as persisted in the remote order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    order_id: OrderId,
    items: Vec<CartItem>,
    subtotal: u64,
    #[serde(rename = "courierCharges")]
    shipping_total: u64,
    #[serde(rename = "courierBreakdown", default)]
    shipping_lines: Vec<ShippingLine>,
    #[serde(rename = "total")]
    grand_total: u64,
    #[serde(default)]
    status: OrderStatus,
    created_at: Timestamp,
    expires_at: Timestamp,
    #[serde(default)]
    whatsapp_sent: bool,
    #[serde(default)]
    invoice_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invoice_generated_at: Option<Timestamp>,
    #[serde(default)]
    stock_reduced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stock_reduced_at: Option<Timestamp>,
    #[serde(default)]
    admin_notes: String,
    last_updated: Timestamp,
}

/// Build an order from the cart and its breakdown, stamped with the current time.
///
/// # Errors
///
/// See [`OrderSnapshot::build`].
pub fn create_order(
    cart: &[CartItem],
    breakdown: &PriceBreakdown,
) -> Result<OrderSnapshot, OrderError> {
    OrderSnapshot::build(cart, breakdown, Timestamp::now())
}

impl OrderSnapshot {
    /// Freeze `cart` and `breakdown` into a pending order created at `now`.
    ///
    /// The order counts as handed off to the messaging app from creation.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: the cart has no lines.
    /// - [`OrderError::Timestamp`]: the expiry time is out of range.
    pub fn build(
        cart: &[CartItem],
        breakdown: &PriceBreakdown,
        now: Timestamp,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let expires_at = now.checked_add(SignedDuration::from_hours(ORDER_LIFETIME_HOURS))?;

        Ok(Self {
            order_id: OrderId::from_timestamp(now),
            items: cart.to_vec(),
            subtotal: breakdown.subtotal(),
            shipping_total: breakdown.shipping_total(),
            shipping_lines: breakdown.shipping_lines().to_vec(),
            grand_total: breakdown.grand_total(),
            status: OrderStatus::Pending,
            created_at: now,
            expires_at,
            whatsapp_sent: true,
            invoice_generated: false,
            invoice_generated_at: None,
            stock_reduced: false,
            stock_reduced_at: None,
            admin_notes: String::new(),
            last_updated: now,
        })
    }

    /// Human-readable order identifier.
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Lines as they were at checkout.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Subtotal at checkout.
    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    /// Shipping total at checkout.
    pub fn shipping_total(&self) -> u64 {
        self.shipping_total
    }

    /// Per-line shipping charges at checkout.
    pub fn shipping_lines(&self) -> &[ShippingLine] {
        &self.shipping_lines
    }

    /// Grand total at checkout.
    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    /// Current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time after which the order is considered stale.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Whether the order has expired at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Whether the handoff message was sent.
    pub fn whatsapp_sent(&self) -> bool {
        self.whatsapp_sent
    }

    /// Whether an invoice has been generated.
    pub fn invoice_generated(&self) -> bool {
        self.invoice_generated
    }

    /// When an invoice was first generated, if ever.
    pub fn invoice_generated_at(&self) -> Option<Timestamp> {
        self.invoice_generated_at
    }

    /// Whether stock was reduced for this order.
    pub fn stock_reduced(&self) -> bool {
        self.stock_reduced
    }

    /// When stock was reduced, if ever.
    pub fn stock_reduced_at(&self) -> Option<Timestamp> {
        self.stock_reduced_at
    }

    /// Accumulated admin notes.
    pub fn admin_notes(&self) -> &str {
        &self.admin_notes
    }

    /// Time of the last admin change.
    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Move the order to `status`. Any transition is allowed.
    pub fn set_status(&mut self, status: OrderStatus, now: Timestamp) {
        self.status = status;
        self.last_updated = now;
    }

    /// Append a timestamped note below earlier ones.
    ///
    /// # Errors
    ///
    /// - [`OrderError::BlankNote`]: `note` is empty or whitespace.
    pub fn add_note(&mut self, note: &str, now: Timestamp) -> Result<(), OrderError> {
        let note = note.trim();

        if note.is_empty() {
            return Err(OrderError::BlankNote);
        }

        let entry = format!("[{now}]\n{note}");

        if self.admin_notes.is_empty() {
            self.admin_notes = entry;
        } else {
            self.admin_notes = format!("{}\n\n{entry}", self.admin_notes);
        }

        self.last_updated = now;

        Ok(())
    }

    /// Record an invoice download. The first generation time is kept.
    pub fn mark_invoice_generated(&mut self, now: Timestamp) {
        if !self.invoice_generated {
            self.invoice_generated = true;
            self.invoice_generated_at = Some(now);
        }

        self.last_updated = now;
    }

    /// Record that stock has been reduced for every line.
    pub fn mark_stock_reduced(&mut self, now: Timestamp) {
        self.stock_reduced = true;
        self.stock_reduced_at = Some(now);
        self.last_updated = now;
    }
}

/// Dashboard figures over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    /// Number of orders.
    pub total_orders: usize,

    /// Orders still pending.
    pub pending: usize,

    /// Orders completed.
    pub completed: usize,

    /// Sum of grand totals of completed orders.
    pub revenue: u64,
}

impl OrderStats {
    /// Tally `orders`. Revenue saturates instead of overflowing.
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a OrderSnapshot>) -> Self {
        orders
            .into_iter()
            .fold(OrderStats::default(), |mut stats, order| {
                stats.total_orders += 1;

                match order.status {
                    OrderStatus::Pending => stats.pending += 1,
                    OrderStatus::Completed => {
                        stats.completed += 1;
                        stats.revenue = stats.revenue.saturating_add(order.grand_total);
                    }
                    OrderStatus::Contacted | OrderStatus::Confirmed | OrderStatus::Cancelled => {}
                }

                stats
            })
    }
}

/// Orders matching `status` (all when `None`) whose id contains `search`, ignoring case.
pub fn filter_orders<'a>(
    orders: &'a [OrderSnapshot],
    status: Option<OrderStatus>,
    search: &str,
) -> Vec<&'a OrderSnapshot> {
    let needle = search.trim().to_lowercase();

    orders
        .iter()
        .filter(|order| status.is_none_or(|status| order.status == status))
        .filter(|order| {
            needle.is_empty() || order.order_id.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::pricing::{ShippingConfig, compute_breakdown};

    fn cart() -> Vec<CartItem> {
        vec![CartItem {
            product_id: "lamp".to_string(),
            selected_size: None,
            name: "Brass Lamp".to_string(),
            image_url: String::new(),
            price: 500,
            sale_price: None,
            courier_charges: None,
            stock_count: 10,
            quantity: 3,
        }]
    }

    fn config() -> ShippingConfig {
        ShippingConfig {
            default_charge: 100,
            free_shipping_threshold: 2_000,
            tax_disclaimer: "GST not included".to_string(),
        }
    }

    fn order_at(now: Timestamp) -> TestResult<OrderSnapshot> {
        let cart = cart();
        let breakdown = compute_breakdown(&cart, &config())?;

        Ok(OrderSnapshot::build(&cart, &breakdown, now)?)
    }

    #[test]
    fn build_copies_breakdown_and_starts_pending() -> TestResult {
        let now: Timestamp = "2026-03-01T10:00:00Z".parse()?;
        let order = order_at(now)?;

        assert_eq!(order.order_id().as_str(), format!("ORD-{}", now.as_millisecond()));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.subtotal(), 1_500);
        assert_eq!(order.shipping_total(), 300);
        assert_eq!(order.grand_total(), 1_800);
        assert_eq!(order.shipping_lines().len(), 1);
        assert_eq!(order.items(), cart().as_slice());
        assert_eq!(order.created_at(), now);
        assert!(order.whatsapp_sent());
        assert!(!order.stock_reduced());

        Ok(())
    }

    #[test]
    fn expires_thirty_days_after_creation() -> TestResult {
        let now: Timestamp = "2026-03-01T10:00:00Z".parse()?;
        let order = order_at(now)?;

        assert_eq!(order.expires_at(), "2026-03-31T10:00:00Z".parse::<Timestamp>()?);
        assert!(!order.is_expired("2026-03-31T09:59:59Z".parse()?));
        assert!(order.is_expired("2026-03-31T10:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn empty_cart_is_rejected() {
        let result = OrderSnapshot::build(&[], &PriceBreakdown::default(), Timestamp::UNIX_EPOCH);

        assert!(
            matches!(result, Err(OrderError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[test]
    fn snapshot_ignores_later_settings_changes() -> TestResult {
        let cart = cart();
        let order = order_at(Timestamp::UNIX_EPOCH)?;

        let cheaper = ShippingConfig {
            default_charge: 10,
            ..config()
        };

        assert_ne!(compute_breakdown(&cart, &cheaper)?.grand_total(), order.grand_total());
        assert_eq!(order.grand_total(), 1_800);

        Ok(())
    }

    #[test]
    fn serializes_with_stored_field_names() -> TestResult {
        let order = order_at(Timestamp::UNIX_EPOCH)?;
        let value = serde_json::to_value(&order)?;

        assert_eq!(value["orderId"], "ORD-0");
        assert_eq!(value["courierCharges"], 300);
        assert_eq!(value["total"], 1_800);
        assert_eq!(value["status"], "pending");
        assert_eq!(value["courierBreakdown"][0]["productName"], "Brass Lamp");

        let back: OrderSnapshot = serde_json::from_value(value)?;

        assert_eq!(back, order);

        Ok(())
    }

    #[test]
    fn status_parses_case_insensitively() -> TestResult {
        assert_eq!("Completed".parse::<OrderStatus>()?, OrderStatus::Completed);
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(OrderStatus::Contacted.label(), "Contacted");

        let result = "shipped".parse::<OrderStatus>();

        assert!(
            matches!(result, Err(OrderError::UnknownStatus(ref status)) if status == "shipped"),
            "expected UnknownStatus, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn notes_accumulate_with_timestamps() -> TestResult {
        let mut order = order_at(Timestamp::UNIX_EPOCH)?;
        let first: Timestamp = "2026-03-02T09:00:00Z".parse()?;
        let second: Timestamp = "2026-03-03T09:00:00Z".parse()?;

        order.add_note("Called customer", first)?;
        order.add_note("  Paid by UPI  ", second)?;

        assert_eq!(
            order.admin_notes(),
            format!("[{first}]\nCalled customer\n\n[{second}]\nPaid by UPI")
        );
        assert_eq!(order.last_updated(), second);

        Ok(())
    }

    #[test]
    fn blank_note_is_rejected() -> TestResult {
        let mut order = order_at(Timestamp::UNIX_EPOCH)?;

        let result = order.add_note("   ", Timestamp::UNIX_EPOCH);

        assert!(
            matches!(result, Err(OrderError::BlankNote)),
            "expected BlankNote, got {result:?}"
        );
        assert!(order.admin_notes().is_empty());

        Ok(())
    }

    #[test]
    fn invoice_generation_keeps_first_time() -> TestResult {
        let mut order = order_at(Timestamp::UNIX_EPOCH)?;
        let first: Timestamp = "2026-03-02T09:00:00Z".parse()?;
        let second: Timestamp = "2026-03-03T09:00:00Z".parse()?;

        order.mark_invoice_generated(first);
        order.mark_invoice_generated(second);

        assert_eq!(order.invoice_generated_at(), Some(first));
        assert_eq!(order.last_updated(), second);

        Ok(())
    }

    #[test]
    fn stats_count_revenue_from_completed_orders_only() -> TestResult {
        let mut completed = order_at(Timestamp::UNIX_EPOCH)?;
        let mut cancelled = order_at(Timestamp::UNIX_EPOCH)?;
        let pending = order_at(Timestamp::UNIX_EPOCH)?;

        completed.set_status(OrderStatus::Completed, Timestamp::UNIX_EPOCH);
        cancelled.set_status(OrderStatus::Cancelled, Timestamp::UNIX_EPOCH);

        let stats = OrderStats::from_orders(&[completed, cancelled, pending]);

        assert_eq!(
            stats,
            OrderStats {
                total_orders: 3,
                pending: 1,
                completed: 1,
                revenue: 1_800,
            }
        );

        Ok(())
    }

    #[test]
    fn filter_by_status_and_id_substring() -> TestResult {
        let mut first = order_at("2026-03-01T10:00:00Z".parse()?)?;
        let second = order_at("2026-03-02T10:00:00Z".parse()?)?;

        first.set_status(OrderStatus::Confirmed, Timestamp::UNIX_EPOCH);

        let orders = vec![first, second];
        let confirmed = filter_orders(&orders, Some(OrderStatus::Confirmed), "");
        let searched = filter_orders(&orders, None, "ord-");
        let none = filter_orders(&orders, None, "ORD-9");

        assert_eq!(confirmed.len(), 1);
        assert_eq!(searched.len(), 2);
        assert!(none.is_empty());

        Ok(())
    }
}
