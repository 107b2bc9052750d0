//! Test context for service-level tests.

use std::sync::Arc;

use jiff::tz::TimeZone;
use serde_json::json;
use testresult::TestResult;

use crate::{
    documents::{DocumentStore, MemoryDocumentStore},
    domain::{
        orders::DocumentOrdersService,
        products::{DocumentProductsService, PRODUCTS_COLLECTION},
        settings::{DocumentSettingsService, SETTINGS_COLLECTION, STORE_SETTINGS_ID},
        stock::DocumentStockGateway,
    },
};

pub(crate) const BASE_URL: &str = "https://amilei.example";

/// Services wired over one in-memory document store seeded with store settings.
pub(crate) struct TestContext {
    pub documents: MemoryDocumentStore,
    pub settings: Arc<DocumentSettingsService>,
    pub products: DocumentProductsService,
    pub orders: DocumentOrdersService,
}

impl TestContext {
    pub async fn new() -> TestResult<Self> {
        let documents = MemoryDocumentStore::new();
        let shared: Arc<dyn DocumentStore> = Arc::new(documents.clone());

        documents
            .put(
                SETTINGS_COLLECTION,
                STORE_SETTINGS_ID,
                json!({
                    "storeName": "Amilei",
                    "whatsappNumber": "+91 90000 00001",
                    "courierCharges": 100,
                    "freeShippingThreshold": 2000,
                }),
            )
            .await?;

        let settings = Arc::new(DocumentSettingsService::new(Arc::clone(&shared)));
        let stock = Arc::new(DocumentStockGateway::new(Arc::clone(&shared)));

        Ok(Self {
            products: DocumentProductsService::new(Arc::clone(&shared)),
            orders: DocumentOrdersService::new(
                shared,
                settings.clone(),
                stock,
                BASE_URL,
                TimeZone::UTC,
            ),
            settings,
            documents,
        })
    }

    /// Store a product with the given price and stock.
    pub async fn seed_product(&self, id: &str, price: u64, stock_count: u32) -> TestResult {
        self.documents
            .put(
                PRODUCTS_COLLECTION,
                id,
                json!({
                    "name": id,
                    "price": price,
                    "stockCount": stock_count,
                    "inStock": stock_count > 0,
                }),
            )
            .await?;

        Ok(())
    }
}
