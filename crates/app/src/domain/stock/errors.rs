//! Stock gateway errors.

use thiserror::Error;

use crate::documents::DocumentError;

#[derive(Debug, Error)]
pub enum StockError {
    #[error("Product not found")]
    NotFound(String),

    #[error("stock storage error")]
    Document(#[from] DocumentError),

    #[error("malformed product document")]
    Malformed(#[from] serde_json::Error),
}
