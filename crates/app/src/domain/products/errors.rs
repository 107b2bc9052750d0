//! Products service errors.

use thiserror::Error;

use crate::documents::DocumentError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("product id must not be blank")]
    BlankId,

    #[error("product storage error")]
    Document(#[from] DocumentError),

    #[error("malformed product document")]
    Malformed(#[from] serde_json::Error),
}
