//! Document store
//!
//! The remote store holds JSON documents grouped into collections (`products`, `orders`,
//! `settings`). Documents are addressed by a storage key that is unrelated to any id held in
//! the document body.

use std::io;

use async_trait::async_trait;
use mockall::automock;
use serde_json::{Map, Value};
use thiserror::Error;

mod fs;
mod memory;

pub use fs::FsDocumentStore;
pub use memory::MemoryDocumentStore;

/// Document store errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("invalid collection or document id: {0:?}")]
    InvalidPath(String),

    #[error("document body must be a JSON object")]
    NotAnObject,

    #[error("document storage I/O failed")]
    Io(#[from] io::Error),

    #[error("malformed document")]
    Json(#[from] serde_json::Error),
}

/// A document and its storage key.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[automock]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document. A missing document is `Ok(None)`.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentError>;

    /// Create or replace a document.
    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), DocumentError>;

    /// Merge top-level fields into an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), DocumentError>;

    /// Create a document under a generated key and return the key.
    async fn add(&self, collection: &str, data: Value) -> Result<String, DocumentError>;

    /// First document whose top-level `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Option<Document>, DocumentError>;

    /// Every document in a collection, ordered by key.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DocumentError>;
}

/// Generated keys sort by creation time.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

/// Collections and ids become path segments, so only a conservative alphabet is allowed.
pub(crate) fn validate_segment(segment: &str) -> Result<(), DocumentError> {
    let valid = !segment.is_empty()
        && segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');

    if valid {
        Ok(())
    } else {
        Err(DocumentError::InvalidPath(segment.to_string()))
    }
}

pub(crate) fn require_object(data: &Value) -> Result<(), DocumentError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(DocumentError::NotAnObject)
    }
}

pub(crate) fn merge_fields(
    target: &mut Value,
    fields: Map<String, Value>,
) -> Result<(), DocumentError> {
    let object = target.as_object_mut().ok_or(DocumentError::NotAnObject)?;

    object.extend(fields);

    Ok(())
}
