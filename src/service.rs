//! Store management operations
//!
//! Everything the admin screen does goes through [`StoresService`]: form-style
//! create/update with required-field checks, the filtered listing, the
//! location set, and bulk import/export.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{StoresError, StoresResult};
use crate::excel::{StoreExporter, StoreImporter};
use crate::locations::LocationSet;
use crate::store::{
    Document, DocumentStore, Fields, LOCATIONS_COLLECTION, STORES_COLLECTION,
};
use crate::types::{today, ExportedFile, ImportReport, StoreEntry, StoreFilter, StoreRecord};

pub struct StoresService {
    store: Arc<dyn DocumentStore>,
}

impl StoresService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All stores matching the filter, in store order
    pub async fn list(&self, filter: &StoreFilter) -> StoresResult<Vec<StoreEntry>> {
        let docs = self.store.list_all(STORES_COLLECTION).await?;
        let entries = docs
            .into_iter()
            .map(entry_from_document)
            .collect::<StoresResult<Vec<_>>>()?;
        Ok(entries
            .into_iter()
            .filter(|entry| filter.matches(&entry.record))
            .collect())
    }

    pub async fn get(&self, id: &str) -> StoresResult<StoreEntry> {
        self.list(&StoreFilter::default())
            .await?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| StoresError::NotFound(format!("{}/{}", STORES_COLLECTION, id)))
    }

    pub async fn create(&self, record: StoreRecord) -> StoresResult<StoreEntry> {
        self.check_form(&record).await?;
        let id = self
            .store
            .create(STORES_COLLECTION, record_to_fields(&record)?)
            .await
            .inspect_err(|e| error!(error = %e, "failed to create store"))?;

        info!(%id, store = %record.store_name, "store created");
        Ok(StoreEntry { id, record })
    }

    pub async fn update(&self, id: &str, record: StoreRecord) -> StoresResult<StoreEntry> {
        self.check_form(&record).await?;
        self.store
            .update(STORES_COLLECTION, id, record_to_fields(&record)?)
            .await
            .inspect_err(|e| error!(%id, error = %e, "failed to update store"))?;

        info!(%id, "store updated");
        Ok(StoreEntry {
            id: id.to_string(),
            record,
        })
    }

    pub async fn delete(&self, id: &str) -> StoresResult<()> {
        self.store
            .delete(STORES_COLLECTION, id)
            .await
            .inspect_err(|e| error!(%id, error = %e, "failed to delete store"))?;
        info!(%id, "store deleted");
        Ok(())
    }

    /// Seed locations followed by every persisted one not already present
    pub async fn locations(&self) -> StoresResult<LocationSet> {
        let mut set = LocationSet::seeded();
        let docs = self.store.list_all(LOCATIONS_COLLECTION).await?;
        set.extend(docs.into_iter().filter_map(|doc| match doc.fields.get("name") {
            Some(Value::String(name)) => Some(name.clone()),
            _ => None,
        }));
        Ok(set)
    }

    /// Persist a new location label verbatim and return the grown set
    pub async fn add_location(&self, name: &str) -> StoresResult<LocationSet> {
        if name.trim().is_empty() {
            return Err(StoresError::Validation(
                "Location name must not be empty".to_string(),
            ));
        }

        let mut set = self.locations().await?;
        if set.contains(name) {
            info!(location = name, "location already known");
            return Ok(set);
        }

        let mut fields = Fields::new();
        fields.insert("name".to_string(), Value::String(name.to_string()));
        self.store
            .create(LOCATIONS_COLLECTION, fields)
            .await
            .inspect_err(|e| error!(location = name, error = %e, "failed to add location"))?;

        set.insert(name);
        info!(location = name, "location added");
        Ok(set)
    }

    /// Export the filtered stores as a dated workbook
    pub async fn export(&self, filter: &StoreFilter) -> StoresResult<ExportedFile> {
        let records: Vec<StoreRecord> = self
            .list(filter)
            .await?
            .into_iter()
            .map(|entry| entry.record)
            .collect();

        StoreExporter::new(records)
            .to_file(&today())
            .inspect_err(|e| error!(error = %e, "export failed"))
    }

    /// Parse a workbook and append every accepted row as a new store.
    ///
    /// Nothing is written unless the whole file parses. Writes are issued
    /// together and the result is reported once all of them have settled;
    /// stores written before a failure stay written.
    pub async fn import(&self, bytes: Vec<u8>) -> StoresResult<ImportReport> {
        let batch = tokio::task::spawn_blocking(move || StoreImporter::from_bytes(bytes).import())
            .await
            .map_err(|e| StoresError::Parse(format!("Import task failed: {}", e)))?
            .inspect_err(|e| error!(error = %e, "import failed"))?;

        if batch.records.is_empty() {
            warn!(skipped = batch.skipped, "no valid rows in imported file");
            return Err(StoresError::NoValidData {
                skipped: batch.skipped,
            });
        }

        let total = batch.records.len();
        let writes = batch.records.iter().map(|record| async move {
            let fields = record_to_fields(record)?;
            self.store.create(STORES_COLLECTION, fields).await
        });
        let failures: Vec<StoresError> = join_all(writes)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if let Some(first) = failures.first() {
            error!(
                failed = failures.len(),
                written = total - failures.len(),
                error = %first,
                "import partially saved"
            );
            return Err(StoresError::Persistence(format!(
                "{} of {} imported stores could not be saved: {}",
                failures.len(),
                total,
                first
            )));
        }

        info!(imported = total, skipped = batch.skipped, "import complete");
        Ok(ImportReport {
            imported: total,
            skipped: batch.skipped,
        })
    }

    /// Required fields plus a known location
    async fn check_form(&self, record: &StoreRecord) -> StoresResult<()> {
        record.validate()?;
        if !self.locations().await?.contains(&record.location) {
            return Err(StoresError::Validation(format!(
                "Unknown location '{}'",
                record.location
            )));
        }
        Ok(())
    }
}

fn record_to_fields(record: &StoreRecord) -> StoresResult<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoresError::Persistence(format!(
            "Store record serialized to non-object: {}",
            other
        ))),
    }
}

/// Documents written by other clients may hold numbers (phones) or nulls
fn entry_from_document(doc: Document) -> StoresResult<StoreEntry> {
    let fields: Fields = doc
        .fields
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Number(n) => Some((key, Value::String(n.to_string()))),
            Value::Bool(b) => Some((key, Value::String(b.to_string()))),
            other => Some((key, other)),
        })
        .collect();

    Ok(StoreEntry {
        id: doc.id,
        record: serde_json::from_value(Value::Object(fields))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_record_fields_use_camel_case() {
        let fields = record_to_fields(&StoreRecord::new("A", "سردا", "اجتماع")).unwrap();
        assert_eq!(fields["storeName"], json!("A"));
        assert_eq!(fields["location"], json!("سردا"));
        assert_eq!(fields.len(), 10);
    }

    #[test]
    fn test_entry_from_document_coerces_numbers() {
        let mut fields = Fields::new();
        fields.insert("storeName".to_string(), json!("Kiosk"));
        fields.insert("storePhone".to_string(), json!(22987654));
        fields.insert("managerPhone".to_string(), Value::Null);
        let entry = entry_from_document(Document {
            id: "abc".to_string(),
            fields,
        })
        .unwrap();

        assert_eq!(entry.id, "abc");
        assert_eq!(entry.record.store_phone, "22987654");
        assert_eq!(entry.record.manager_phone, "");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let service = StoresService::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            service.get("missing").await,
            Err(StoresError::NotFound(_))
        ));
    }
}
