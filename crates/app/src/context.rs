//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::{ConfigError, StoreConfig},
    documents::{DocumentStore, FsDocumentStore},
    domain::{
        orders::{DocumentOrdersService, OrdersService},
        products::{DocumentProductsService, ProductsService},
        settings::{DocumentSettingsService, SettingsService},
        stock::{DocumentStockGateway, StockGateway},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub settings: Arc<dyn SettingsService>,
    pub stock: Arc<dyn StockGateway>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context over the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured time zone cannot be resolved.
    pub fn from_config(config: &StoreConfig) -> Result<Self, AppInitError> {
        let time_zone = config.time_zone()?;
        let documents: Arc<dyn DocumentStore> = Arc::new(FsDocumentStore::new(&config.data_dir));

        let settings: Arc<dyn SettingsService> =
            Arc::new(DocumentSettingsService::new(Arc::clone(&documents)));
        let stock: Arc<dyn StockGateway> =
            Arc::new(DocumentStockGateway::new(Arc::clone(&documents)));

        Ok(Self {
            products: Arc::new(DocumentProductsService::new(Arc::clone(&documents))),
            orders: Arc::new(DocumentOrdersService::new(
                documents,
                Arc::clone(&settings),
                Arc::clone(&stock),
                config.base_url.clone(),
                time_zone,
            )),
            settings,
            stock,
        })
    }
}
