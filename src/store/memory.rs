use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{new_id, Document, DocumentStore, Fields};
use crate::error::{StoresError, StoresResult};

/// In-process document store; contents are lost when it is dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_all(&self, collection: &str) -> StoresResult<Vec<Document>> {
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: &str, fields: Fields) -> StoresResult<String> {
        let id = new_id();
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoresResult<()> {
        let mut collections = self.collections.lock().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoresError::NotFound(format!("{}/{}", collection, id)))?;
        doc.fields = fields;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoresResult<()> {
        let mut collections = self.collections.lock().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoresError::NotFound(format!("{}/{}", collection, id)))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoresError::NotFound(format!("{}/{}", collection, id)));
        }
        Ok(())
    }
}
