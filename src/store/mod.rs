//! Document store boundary
//!
//! The admin screen only ever needs four calls against a collection of
//! schemaless documents. No call is transactional with any other.

mod memory;
mod yaml;

pub use memory::MemoryStore;
pub use yaml::YamlStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoresResult;

/// Collection holding store records
pub const STORES_COLLECTION: &str = "stores";

/// Collection holding user-added locations as `{name}` documents
pub const LOCATIONS_COLLECTION: &str = "locations";

/// Document fields as the store keeps them
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A stored document with its store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in the collection, in insertion order
    async fn list_all(&self, collection: &str) -> StoresResult<Vec<Document>>;

    /// Insert a new document and return its id
    async fn create(&self, collection: &str, fields: Fields) -> StoresResult<String>;

    /// Replace the fields of an existing document
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoresResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> StoresResult<()>;
}

/// Fresh document id
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
