//! Settings service errors.

use thiserror::Error;

use crate::documents::DocumentError;

#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error("settings storage error")]
    Document(#[from] DocumentError),

    #[error("malformed settings document")]
    Malformed(#[from] serde_json::Error),
}
