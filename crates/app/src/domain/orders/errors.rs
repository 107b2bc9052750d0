//! Orders service errors.

use storefront::{invoice::InvoiceError, orders::OrderError, pricing::PricingError};
use thiserror::Error;

use crate::{documents::DocumentError, domain::settings::SettingsServiceError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound(String),

    #[error("stock was already reduced for this order")]
    StockAlreadyReduced,

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    #[error("failed to load store settings")]
    Settings(#[from] SettingsServiceError),

    #[error("order storage error")]
    Document(#[from] DocumentError),

    #[error("malformed order document")]
    Malformed(#[from] serde_json::Error),
}
