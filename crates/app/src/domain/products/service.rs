//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use storefront::products::Product;

use crate::{
    documents::{Document, DocumentStore},
    domain::products::errors::ProductsServiceError,
};

pub const PRODUCTS_COLLECTION: &str = "products";

#[derive(Clone)]
pub struct DocumentProductsService {
    documents: Arc<dyn DocumentStore>,
}

impl DocumentProductsService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

/// Variants are normalized while deserializing, so legacy bare-string sizes never leave here.
pub(crate) fn product_from_document(id: &str, data: Value) -> Result<Product, serde_json::Error> {
    let mut product: Product = serde_json::from_value(data)?;

    product.id = id.to_string();

    Ok(product)
}

#[async_trait]
impl ProductsService for DocumentProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let documents = self.documents.list(PRODUCTS_COLLECTION).await?;

        let products = documents
            .into_iter()
            .map(|Document { id, data }| product_from_document(&id, data))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    async fn get_product(&self, id: &str) -> Result<Product, ProductsServiceError> {
        let data = self
            .documents
            .get(PRODUCTS_COLLECTION, id)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        Ok(product_from_document(id, data)?)
    }

    async fn put_product(&self, product: Product) -> Result<Product, ProductsServiceError> {
        if product.id.trim().is_empty() {
            return Err(ProductsServiceError::BlankId);
        }

        let data = serde_json::to_value(&product)?;

        self.documents
            .put(PRODUCTS_COLLECTION, &product.id, data)
            .await?;

        Ok(product)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products, ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, id: &str) -> Result<Product, ProductsServiceError>;

    /// Creates or replaces a product under its id.
    async fn put_product(&self, product: Product) -> Result<Product, ProductsServiceError>;
}
