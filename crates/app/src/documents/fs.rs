//! Filesystem document store: `<root>/<collection>/<id>.json`.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;

use super::{
    Document, DocumentError, DocumentStore, generate_id, merge_fields, require_object,
    validate_segment,
};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Store documents below `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, DocumentError> {
        validate_segment(collection)?;

        Ok(self.root.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, DocumentError> {
        validate_segment(id)?;

        Ok(self
            .collection_dir(collection)?
            .join(format!("{id}.{EXTENSION}")))
    }

    async fn read(&self, path: &Path) -> Result<Option<Value>, DocumentError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, path: &Path, data: &Value) -> Result<(), DocumentError> {
        let staging = path.with_extension("json.tmp");

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&staging, serde_json::to_vec_pretty(data)?).await?;
        fs::rename(&staging, path).await?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentError> {
        let path = self.document_path(collection, id)?;

        self.read(&path).await
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), DocumentError> {
        require_object(&data)?;

        let path = self.document_path(collection, id)?;

        self.write(&path, &data).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), DocumentError> {
        let path = self.document_path(collection, id)?;

        let mut document = self
            .read(&path)
            .await?
            .ok_or_else(|| DocumentError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        merge_fields(&mut document, fields)?;

        self.write(&path, &document).await
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
        Ok(self
            .list(collection)
            .await?
            .into_iter()
            .find(|document| document.data.get(field) == Some(&value)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DocumentError> {
        let dir = self.collection_dir(collection)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut documents = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }

            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            if let Some(data) = self.read(&path).await? {
                documents.push(Document {
                    id: id.to_string(),
                    data,
                });
            }
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(documents)
    }
}
