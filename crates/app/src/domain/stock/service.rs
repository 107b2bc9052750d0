//! Stock adjustment gateway.
//!
//! Decrements are a read followed by a write with no isolation between them. Two sales of the
//! same product racing each other can both read the old count, and the later write wins.
//! Oversold units are reported rather than prevented.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    documents::DocumentStore,
    domain::{
        products::{PRODUCTS_COLLECTION, product_from_document},
        stock::errors::StockError,
    },
};

/// Outcome of one stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    /// Stock read before the write.
    pub previous: u32,

    /// Stock written back, never below zero.
    pub remaining: u32,

    /// Units sold beyond the stock that was read.
    pub oversold: u32,
}

impl StockAdjustment {
    /// Subtract `quantity_sold` from `previous`, flooring at zero.
    pub fn compute(previous: u32, quantity_sold: u32) -> Self {
        Self {
            previous,
            remaining: previous.saturating_sub(quantity_sold),
            oversold: quantity_sold.saturating_sub(previous),
        }
    }

    pub fn in_stock(&self) -> bool {
        self.remaining > 0
    }
}

#[derive(Clone)]
pub struct DocumentStockGateway {
    documents: Arc<dyn DocumentStore>,
}

impl DocumentStockGateway {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl StockGateway for DocumentStockGateway {
    async fn reduce_stock(
        &self,
        product_id: &str,
        quantity_sold: u32,
    ) -> Result<StockAdjustment, StockError> {
        let data = self
            .documents
            .get(PRODUCTS_COLLECTION, product_id)
            .await?
            .ok_or_else(|| StockError::NotFound(product_id.to_string()))?;

        let product = product_from_document(product_id, data)?;
        let adjustment = StockAdjustment::compute(product.stock_count, quantity_sold);

        let mut fields = Map::new();
        fields.insert("stockCount".to_string(), Value::from(adjustment.remaining));
        fields.insert("inStock".to_string(), Value::from(adjustment.in_stock()));

        self.documents
            .update(PRODUCTS_COLLECTION, product_id, fields)
            .await?;

        if adjustment.oversold > 0 {
            warn!(
                product_id,
                oversold = adjustment.oversold,
                "sale exceeded recorded stock"
            );
        }

        info!(
            product_id,
            previous = adjustment.previous,
            remaining = adjustment.remaining,
            "stock reduced"
        );

        Ok(adjustment)
    }
}

#[automock]
#[async_trait]
pub trait StockGateway: Send + Sync {
    /// Decrement a product's stock by `quantity_sold` and refresh its `inStock` flag.
    ///
    /// Not atomic against concurrent decrements of the same product.
    async fn reduce_stock(
        &self,
        product_id: &str,
        quantity_sold: u32,
    ) -> Result<StockAdjustment, StockError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::documents::MemoryDocumentStore;

    use super::*;

    async fn gateway_with_stock(
        stock_count: u32,
    ) -> TestResult<(MemoryDocumentStore, DocumentStockGateway)> {
        let documents = MemoryDocumentStore::new();

        documents
            .put(
                PRODUCTS_COLLECTION,
                "lamp",
                json!({ "name": "Lamp", "price": 500, "stockCount": stock_count, "inStock": true }),
            )
            .await?;

        let gateway = DocumentStockGateway::new(Arc::new(documents.clone()));

        Ok((documents, gateway))
    }

    #[test]
    fn compute_floors_at_zero() {
        assert_eq!(
            StockAdjustment::compute(3, 5),
            StockAdjustment {
                previous: 3,
                remaining: 0,
                oversold: 2,
            }
        );
    }

    #[tokio::test]
    async fn reduce_stock_writes_count_and_flag() -> TestResult {
        let (documents, gateway) = gateway_with_stock(5).await?;

        let adjustment = gateway.reduce_stock("lamp", 2).await?;

        assert_eq!(adjustment.remaining, 3);

        let stored = documents.get(PRODUCTS_COLLECTION, "lamp").await?;

        assert_eq!(
            stored,
            Some(json!({ "name": "Lamp", "price": 500, "stockCount": 3, "inStock": true }))
        );

        Ok(())
    }

    #[tokio::test]
    async fn selling_last_units_marks_out_of_stock() -> TestResult {
        let (documents, gateway) = gateway_with_stock(2).await?;

        let adjustment = gateway.reduce_stock("lamp", 4).await?;

        assert_eq!(adjustment.oversold, 2);

        let stored = documents
            .get(PRODUCTS_COLLECTION, "lamp")
            .await?
            .unwrap_or_default();

        assert_eq!(stored["stockCount"], 0);
        assert_eq!(stored["inStock"], false);

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_returns_not_found() -> TestResult {
        let (_documents, gateway) = gateway_with_stock(2).await?;

        let result = gateway.reduce_stock("vase", 1).await;

        assert!(
            matches!(result, Err(StockError::NotFound(ref id)) if id == "vase"),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
