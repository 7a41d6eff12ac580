//! YAML-file document store
//!
//! One `<collection>.yaml` file per collection under a data directory, holding
//! the documents as a sequence. Every write rewrites the whole file; the
//! mutex serialises writers within the process.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{new_id, Document, DocumentStore, Fields};
use crate::error::{StoresError, StoresResult};

#[derive(Debug)]
pub struct YamlStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl YamlStore {
    /// Open (and create if needed) a data directory
    pub fn open<P: AsRef<Path>>(dir: P) -> StoresResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> StoresResult<PathBuf> {
        if collection.is_empty()
            || !collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StoresError::Persistence(format!(
                "Invalid collection name '{}'",
                collection
            )));
        }
        Ok(self.dir.join(format!("{}.yaml", collection)))
    }

    async fn load(&self, collection: &str) -> StoresResult<Vec<Document>> {
        let path = self.collection_path(collection)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    async fn save(&self, collection: &str, docs: &[Document]) -> StoresResult<()> {
        let path = self.collection_path(collection)?;
        let content = serde_yaml::to_string(docs)?;
        // Write beside the target, then rename over it
        let tmp = path.with_extension("yaml.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(collection, documents = docs.len(), "saved collection");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for YamlStore {
    async fn list_all(&self, collection: &str) -> StoresResult<Vec<Document>> {
        let _guard = self.lock.lock().await;
        self.load(collection).await
    }

    async fn create(&self, collection: &str, fields: Fields) -> StoresResult<String> {
        // Load and rewrite per document: a batch of N creates costs N full rewrites
        let _guard = self.lock.lock().await;
        let mut docs = self.load(collection).await?;
        let id = new_id();
        docs.push(Document {
            id: id.clone(),
            fields,
        });
        self.save(collection, &docs).await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoresResult<()> {
        let _guard = self.lock.lock().await;
        let mut docs = self.load(collection).await?;
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoresError::NotFound(format!("{}/{}", collection, id)))?;
        doc.fields = fields;
        self.save(collection, &docs).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoresResult<()> {
        let _guard = self.lock.lock().await;
        let mut docs = self.load(collection).await?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoresError::NotFound(format!("{}/{}", collection, id)));
        }
        self.save(collection, &docs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn fields(name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), json!(name));
        fields
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let id = {
            let store = YamlStore::open(dir.path()).unwrap();
            store.create("locations", fields("نابلس")).await.unwrap()
        };

        let store = YamlStore::open(dir.path()).unwrap();
        let docs = store.list_all("locations").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].fields["name"], json!("نابلس"));
        assert!(dir.path().join("locations.yaml").exists());
    }

    #[tokio::test]
    async fn test_update_delete_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = YamlStore::open(dir.path()).unwrap();
        let id = store.create("stores", fields("a")).await.unwrap();

        store.update("stores", &id, fields("b")).await.unwrap();
        assert_eq!(
            store.list_all("stores").await.unwrap()[0].fields["name"],
            json!("b")
        );

        store.delete("stores", &id).await.unwrap();
        assert!(store.list_all("stores").await.unwrap().is_empty());
        assert!(matches!(
            store.delete("stores", &id).await,
            Err(StoresError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_like_collection_names() {
        let dir = TempDir::new().unwrap();
        let store = YamlStore::open(dir.path()).unwrap();
        let result = store.list_all("../etc").await;
        assert!(matches!(result, Err(StoresError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_yaml_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("stores.yaml"), "{{{ not yaml").unwrap();
        let store = YamlStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.list_all("stores").await,
            Err(StoresError::Yaml(_))
        ));
    }
}
