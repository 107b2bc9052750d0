//! Settings service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::settings::StoreSettings;
use tracing::warn;

use crate::{documents::DocumentStore, domain::settings::errors::SettingsServiceError};

pub const SETTINGS_COLLECTION: &str = "settings";
pub const STORE_SETTINGS_ID: &str = "store";

#[derive(Clone)]
pub struct DocumentSettingsService {
    documents: Arc<dyn DocumentStore>,
}

impl DocumentSettingsService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl SettingsService for DocumentSettingsService {
    async fn store_settings(&self) -> Result<StoreSettings, SettingsServiceError> {
        let Some(document) = self
            .documents
            .get(SETTINGS_COLLECTION, STORE_SETTINGS_ID)
            .await?
        else {
            warn!("store settings document missing, using defaults");

            return Ok(StoreSettings::default());
        };

        let settings: StoreSettings = serde_json::from_value(document)?;

        Ok(settings.normalized())
    }

    async fn save_settings(&self, settings: StoreSettings) -> Result<(), SettingsServiceError> {
        let document = serde_json::to_value(settings.normalized())?;

        self.documents
            .put(SETTINGS_COLLECTION, STORE_SETTINGS_ID, document)
            .await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Current store settings; defaults when none are stored.
    async fn store_settings(&self) -> Result<StoreSettings, SettingsServiceError>;

    /// Replace the stored settings.
    async fn save_settings(&self, settings: StoreSettings) -> Result<(), SettingsServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::documents::MemoryDocumentStore;

    use super::*;

    fn service() -> (MemoryDocumentStore, DocumentSettingsService) {
        let documents = MemoryDocumentStore::new();
        let service = DocumentSettingsService::new(Arc::new(documents.clone()));

        (documents, service)
    }

    #[tokio::test]
    async fn missing_document_yields_defaults() -> TestResult {
        let (_documents, service) = service();

        assert_eq!(service.store_settings().await?, StoreSettings::default());

        Ok(())
    }

    #[tokio::test]
    async fn partial_document_falls_back_per_field() -> TestResult {
        let (documents, service) = service();

        documents
            .put(
                SETTINGS_COLLECTION,
                STORE_SETTINGS_ID,
                json!({ "storeName": "Amilei", "freeShippingThreshold": 1500 }),
            )
            .await?;

        let settings = service.store_settings().await?;

        assert_eq!(settings.store_name, "Amilei");
        assert_eq!(settings.free_shipping_threshold, 1_500);
        assert_eq!(settings.courier_charges, 100);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() -> TestResult {
        let (documents, service) = service();

        documents
            .put(
                SETTINGS_COLLECTION,
                STORE_SETTINGS_ID,
                json!({ "courierCharges": "a lot" }),
            )
            .await?;

        let result = service.store_settings().await;

        assert!(
            matches!(result, Err(SettingsServiceError::Malformed(_))),
            "expected Malformed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn saved_settings_are_read_back() -> TestResult {
        let (_documents, service) = service();

        let settings = StoreSettings {
            store_name: "Amilei".to_string(),
            whatsapp_number: "919000000001".to_string(),
            ..StoreSettings::default()
        };

        service.save_settings(settings.clone()).await?;

        assert_eq!(service.store_settings().await?, settings);

        Ok(())
    }
}
