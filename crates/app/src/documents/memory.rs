//! In-memory document store.

use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use super::{
    Document, DocumentError, DocumentStore, generate_id, merge_fields, require_object,
    validate_segment,
};

type Collections = FxHashMap<String, BTreeMap<String, Value>>;

/// Document store held in process memory. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), DocumentError> {
        validate_segment(collection)?;
        validate_segment(id)?;
        require_object(&data)?;

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);

        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), DocumentError> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| DocumentError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        merge_fields(document, fields)
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String, DocumentError> {
        let id = generate_id();

        self.put(collection, &id, data).await?;

        Ok(id)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Option<Document>, DocumentError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(collections.get(collection).and_then(|documents| {
            documents
                .iter()
                .find(|(_id, data)| data.get(field) == Some(&value))
                .map(|(id, data)| Document {
                    id: id.clone(),
                    data: data.clone(),
                })
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DocumentError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
