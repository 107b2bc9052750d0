//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use serde::Serialize;
use serde_json::Value;
use storefront::{
    cart::CartItem,
    checkout::Handoff,
    invoice::{InvoiceData, StoreIdentity},
    orders::{OrderSnapshot, OrderStatus},
    pricing::compute_breakdown,
};
use tracing::{error, info, warn};

use crate::{
    documents::{Document, DocumentStore},
    domain::{
        orders::errors::OrdersServiceError,
        settings::SettingsService,
        stock::{StockAdjustment, StockError, StockGateway},
    },
};

pub const ORDERS_COLLECTION: &str = "orders";

/// An order and its storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
    pub key: String,
    pub order: OrderSnapshot,
}

/// A freshly persisted order and the message handing it to the store owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub key: String,
    pub order: OrderSnapshot,
    pub handoff: Handoff,
}

/// Stock adjustment applied for one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAdjustment {
    pub product_id: String,
    pub adjustment: StockAdjustment,
}

/// Result of reducing stock for every line of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub adjusted: Vec<LineAdjustment>,

    /// Products that no longer exist; their lines were skipped.
    pub missing: Vec<String>,

    /// Lines whose adjustment failed for another reason; they are not retried.
    pub failed: Vec<LineFailure>,
}

/// A line whose stock could not be adjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFailure {
    pub product_id: String,
    pub reason: String,
}

pub struct DocumentOrdersService {
    documents: Arc<dyn DocumentStore>,
    settings: Arc<dyn SettingsService>,
    stock: Arc<dyn StockGateway>,
    base_url: String,
    time_zone: TimeZone,
}

impl DocumentOrdersService {
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        settings: Arc<dyn SettingsService>,
        stock: Arc<dyn StockGateway>,
        base_url: impl Into<String>,
        time_zone: TimeZone,
    ) -> Self {
        Self {
            documents,
            settings,
            stock,
            base_url: base_url.into(),
            time_zone,
        }
    }

    async fn save(&self, stored: &StoredOrder) -> Result<(), OrdersServiceError> {
        let data = serde_json::to_value(&stored.order)?;

        self.documents
            .put(ORDERS_COLLECTION, &stored.key, data)
            .await?;

        Ok(())
    }
}

fn stored_order(Document { id, data }: Document) -> Result<StoredOrder, OrdersServiceError> {
    Ok(StoredOrder {
        key: id,
        order: serde_json::from_value(data)?,
    })
}

#[async_trait]
impl OrdersService for DocumentOrdersService {
    async fn place_order(&self, cart: Vec<CartItem>) -> Result<PlacedOrder, OrdersServiceError> {
        let settings = self.settings.store_settings().await?;
        let breakdown = compute_breakdown(&cart, &settings.shipping())?;
        let order = OrderSnapshot::build(&cart, &breakdown, Timestamp::now())?;

        let key = self
            .documents
            .add(ORDERS_COLLECTION, serde_json::to_value(&order)?)
            .await
            .inspect_err(|error| {
                error!(order_id = %order.order_id(), %error, "failed to persist order");
            })?;

        info!(
            order_id = %order.order_id(),
            total = order.grand_total(),
            lines = order.items().len(),
            "order placed"
        );

        let handoff = Handoff::for_order(&order, &settings, &self.base_url);

        Ok(PlacedOrder {
            key,
            order,
            handoff,
        })
    }

    async fn find_order(&self, order_id: &str) -> Result<StoredOrder, OrdersServiceError> {
        let document = self
            .documents
            .find_by_field(ORDERS_COLLECTION, "orderId", Value::from(order_id))
            .await?
            .ok_or_else(|| OrdersServiceError::NotFound(order_id.to_string()))?;

        stored_order(document)
    }

    async fn list_orders(&self) -> Result<Vec<StoredOrder>, OrdersServiceError> {
        let mut orders = self
            .documents
            .list(ORDERS_COLLECTION)
            .await?
            .into_iter()
            .map(stored_order)
            .collect::<Result<Vec<_>, _>>()?;

        orders.sort_by_key(|stored| std::cmp::Reverse(stored.order.created_at()));

        Ok(orders)
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<OrderSnapshot, OrdersServiceError> {
        let mut stored = self.find_order(order_id).await?;

        stored.order.set_status(status, Timestamp::now());

        self.save(&stored).await?;

        info!(order_id, %status, "order status updated");

        Ok(stored.order)
    }

    async fn add_note(
        &self,
        order_id: &str,
        note: &str,
    ) -> Result<OrderSnapshot, OrdersServiceError> {
        let mut stored = self.find_order(order_id).await?;

        stored.order.add_note(note, Timestamp::now())?;

        self.save(&stored).await?;

        Ok(stored.order)
    }

    async fn reduce_stock_for_order(
        &self,
        order_id: &str,
    ) -> Result<StockReport, OrdersServiceError> {
        let mut stored = self.find_order(order_id).await?;

        if stored.order.stock_reduced() {
            return Err(OrdersServiceError::StockAlreadyReduced);
        }

        let mut report = StockReport::default();

        for item in stored.order.items() {
            match self.stock.reduce_stock(&item.product_id, item.quantity).await {
                Ok(adjustment) => report.adjusted.push(LineAdjustment {
                    product_id: item.product_id.clone(),
                    adjustment,
                }),
                Err(StockError::NotFound(product_id)) => {
                    warn!(order_id, %product_id, "product missing, stock not reduced");

                    report.missing.push(product_id);
                }
                Err(error) => {
                    error!(order_id, product_id = %item.product_id, %error, "stock not reduced");

                    report.failed.push(LineFailure {
                        product_id: item.product_id.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        stored.order.mark_stock_reduced(Timestamp::now());

        self.save(&stored).await?;

        Ok(report)
    }

    async fn invoice(&self, order_id: &str) -> Result<InvoiceData, OrdersServiceError> {
        let mut stored = self.find_order(order_id).await?;
        let settings = self.settings.store_settings().await?;

        let invoice = InvoiceData::from_order(
            &stored.order,
            StoreIdentity::from(&settings),
            &settings.gst_message,
            &self.time_zone,
        )?;

        stored.order.mark_invoice_generated(Timestamp::now());

        self.save(&stored).await?;

        Ok(invoice)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Price the cart with the current settings and persist it as a pending order.
    ///
    /// The cart itself is left untouched.
    async fn place_order(&self, cart: Vec<CartItem>) -> Result<PlacedOrder, OrdersServiceError>;

    /// Look an order up by its human-readable id.
    async fn find_order(&self, order_id: &str) -> Result<StoredOrder, OrdersServiceError>;

    /// Every order, newest first.
    async fn list_orders(&self) -> Result<Vec<StoredOrder>, OrdersServiceError>;

    /// Move an order to a new status.
    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<OrderSnapshot, OrdersServiceError>;

    /// Append an admin note.
    async fn add_note(
        &self,
        order_id: &str,
        note: &str,
    ) -> Result<OrderSnapshot, OrdersServiceError>;

    /// Reduce stock once for every line of a confirmed order.
    ///
    /// Every line is attempted. Lines whose product no longer exists, or whose adjustment fails,
    /// are reported and skipped; the order is marked as reduced either way so a second run
    /// cannot decrement the lines that did succeed.
    async fn reduce_stock_for_order(
        &self,
        order_id: &str,
    ) -> Result<StockReport, OrdersServiceError>;

    /// Invoice data for an order; records that an invoice was generated.
    async fn invoice(&self, order_id: &str) -> Result<InvoiceData, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storefront::settings::StoreSettings;
    use testresult::TestResult;

    use crate::{
        documents::MemoryDocumentStore,
        domain::{
            products::{PRODUCTS_COLLECTION, ProductsService},
            settings::MockSettingsService,
            stock::MockStockGateway,
        },
        test::{TestContext, cart_item},
    };

    use super::*;

    fn settings() -> StoreSettings {
        StoreSettings {
            store_name: "Amilei".to_string(),
            whatsapp_number: "+91 90000 00001".to_string(),
            ..StoreSettings::default()
        }
    }

    #[tokio::test]
    async fn place_order_persists_priced_snapshot() -> TestResult {
        let ctx = TestContext::new().await?;

        let placed = ctx
            .orders
            .place_order(vec![cart_item("lamp", 500, 3)])
            .await?;

        assert_eq!(placed.order.subtotal(), 1_500);
        assert_eq!(placed.order.shipping_total(), 300);
        assert_eq!(placed.order.grand_total(), 1_800);
        assert_eq!(placed.order.status(), OrderStatus::Pending);
        assert!(placed.handoff.url.starts_with("https://wa.me/919000000001?text="));

        let stored = ctx
            .orders
            .find_order(placed.order.order_id().as_str())
            .await?;

        assert_eq!(stored.key, placed.key);
        assert_eq!(stored.order, placed.order);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_uses_current_settings() -> TestResult {
        let mut settings_service = MockSettingsService::new();

        settings_service.expect_store_settings().returning(|| {
            Ok(StoreSettings {
                courier_charges: 40,
                ..settings()
            })
        });

        let documents = Arc::new(MemoryDocumentStore::new());
        let service = DocumentOrdersService::new(
            documents,
            Arc::new(settings_service),
            Arc::new(MockStockGateway::new()),
            "https://amilei.example",
            TimeZone::UTC,
        );

        let placed = service.place_order(vec![cart_item("lamp", 500, 2)]).await?;

        assert_eq!(placed.order.shipping_total(), 80);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_with_empty_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx.orders.place_order(Vec::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Order(_))),
            "expected Order error, got {result:?}"
        );
        assert!(ctx.orders.list_orders().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn find_order_unknown_id_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx.orders.find_order("ORD-0").await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound(_))),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn status_and_notes_are_persisted() -> TestResult {
        let ctx = TestContext::new().await?;
        let placed = ctx
            .orders
            .place_order(vec![cart_item("lamp", 500, 1)])
            .await?;
        let order_id = placed.order.order_id().as_str();

        ctx.orders
            .update_status(order_id, OrderStatus::Confirmed)
            .await?;
        ctx.orders.add_note(order_id, "Paid by UPI").await?;

        let stored = ctx.orders.find_order(order_id).await?;

        assert_eq!(stored.order.status(), OrderStatus::Confirmed);
        assert!(stored.order.admin_notes().ends_with("]\nPaid by UPI"));

        Ok(())
    }

    #[tokio::test]
    async fn reduce_stock_updates_products_once() -> TestResult {
        let ctx = TestContext::new().await?;

        ctx.seed_product("lamp", 500, 5).await?;

        let placed = ctx
            .orders
            .place_order(vec![cart_item("lamp", 500, 2)])
            .await?;
        let order_id = placed.order.order_id().as_str();

        let report = ctx.orders.reduce_stock_for_order(order_id).await?;

        assert_eq!(report.adjusted.len(), 1);
        assert!(report.missing.is_empty());
        assert_eq!(ctx.products.get_product("lamp").await?.stock_count, 3);

        let again = ctx.orders.reduce_stock_for_order(order_id).await;

        assert!(
            matches!(again, Err(OrdersServiceError::StockAlreadyReduced)),
            "expected StockAlreadyReduced, got {again:?}"
        );
        assert_eq!(ctx.products.get_product("lamp").await?.stock_count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn failed_line_does_not_allow_double_reduction() -> TestResult {
        let ctx = TestContext::new().await?;

        ctx.seed_product("lamp", 500, 5).await?;
        ctx.documents
            .put(
                PRODUCTS_COLLECTION,
                "vase",
                json!({ "name": "Vase", "price": 900, "stockCount": "bad" }),
            )
            .await?;

        let placed = ctx
            .orders
            .place_order(vec![cart_item("lamp", 500, 2), cart_item("vase", 900, 1)])
            .await?;
        let order_id = placed.order.order_id().as_str();

        let report = ctx.orders.reduce_stock_for_order(order_id).await?;
        let failed: Vec<_> = report
            .failed
            .iter()
            .map(|line| line.product_id.as_str())
            .collect();

        assert_eq!(report.adjusted.len(), 1);
        assert_eq!(failed, vec!["vase"]);
        assert_eq!(ctx.products.get_product("lamp").await?.stock_count, 3);
        assert!(ctx.orders.find_order(order_id).await?.order.stock_reduced());

        let again = ctx.orders.reduce_stock_for_order(order_id).await;

        assert!(
            matches!(again, Err(OrdersServiceError::StockAlreadyReduced)),
            "expected StockAlreadyReduced, got {again:?}"
        );
        assert_eq!(ctx.products.get_product("lamp").await?.stock_count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn reduce_stock_reports_missing_products() -> TestResult {
        let mut settings_service = MockSettingsService::new();
        settings_service
            .expect_store_settings()
            .returning(|| Ok(settings()));

        let mut stock = MockStockGateway::new();
        stock
            .expect_reduce_stock()
            .withf(|product_id, _quantity| product_id == "vase")
            .returning(|product_id, _quantity| {
                Err(StockError::NotFound(product_id.to_string()))
            });
        stock
            .expect_reduce_stock()
            .withf(|product_id, _quantity| product_id == "lamp")
            .returning(|_product_id, quantity| Ok(StockAdjustment::compute(10, quantity)));

        let service = DocumentOrdersService::new(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(settings_service),
            Arc::new(stock),
            "https://amilei.example",
            TimeZone::UTC,
        );

        let placed = service
            .place_order(vec![cart_item("vase", 900, 1), cart_item("lamp", 500, 2)])
            .await?;
        let order_id = placed.order.order_id().as_str();

        let report = service.reduce_stock_for_order(order_id).await?;

        assert_eq!(report.missing, vec!["vase".to_string()]);
        assert_eq!(report.adjusted.len(), 1);
        assert!(report.failed.is_empty());
        assert!(service.find_order(order_id).await?.order.stock_reduced());

        Ok(())
    }

    #[tokio::test]
    async fn invoice_uses_frozen_totals_and_marks_order() -> TestResult {
        let ctx = TestContext::new().await?;
        let placed = ctx
            .orders
            .place_order(vec![cart_item("lamp", 500, 3)])
            .await?;
        let order_id = placed.order.order_id().as_str();

        ctx.settings
            .save_settings(StoreSettings {
                courier_charges: 0,
                ..settings()
            })
            .await?;

        let invoice = ctx.orders.invoice(order_id).await?;

        assert_eq!(invoice.store.name, "Amilei");
        assert_eq!(invoice.shipping_total, 300);
        assert_eq!(invoice.grand_total, 1_800);
        assert!(ctx.orders.find_order(order_id).await?.order.invoice_generated());

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_is_newest_first() -> TestResult {
        let ctx = TestContext::new().await?;

        let first = ctx
            .orders
            .place_order(vec![cart_item("lamp", 500, 1)])
            .await?;
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = ctx
            .orders
            .place_order(vec![cart_item("mug", 250, 1)])
            .await?;

        let ids: Vec<_> = ctx
            .orders
            .list_orders()
            .await?
            .into_iter()
            .map(|stored| stored.key)
            .collect();

        assert_eq!(ids, vec![second.key, first.key]);

        Ok(())
    }
}
