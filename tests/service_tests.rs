//! Store service integration tests

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stores_admin::excel::StoreExporter;
use stores_admin::locations::SEED_LOCATIONS;
use stores_admin::service::StoresService;
use stores_admin::store::{
    Document, DocumentStore, Fields, MemoryStore, YamlStore, STORES_COLLECTION,
};
use stores_admin::types::today;
use stores_admin::{StoreFilter, StoreRecord, StoresError, StoresResult};
use tempfile::TempDir;

fn memory_service() -> (Arc<MemoryStore>, StoresService) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), StoresService::new(store))
}

fn record(name: &str, location: &str, status: &str) -> StoreRecord {
    StoreRecord::new(name, location, status)
}

/// Accepts the first `allowed` creates, then fails every later one
struct FlakyStore {
    inner: MemoryStore,
    allowed: usize,
    creates: AtomicUsize,
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list_all(&self, collection: &str) -> StoresResult<Vec<Document>> {
        self.inner.list_all(collection).await
    }

    async fn create(&self, collection: &str, fields: Fields) -> StoresResult<String> {
        if self.creates.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            return Err(StoresError::Persistence("backend unavailable".to_string()));
        }
        self.inner.create(collection, fields).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoresResult<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoresResult<()> {
        self.inner.delete(collection, id).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FORM OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_list_update_delete() {
    let (_, service) = memory_service();

    let created = service
        .create(record("Bakery", "سردا", "اجتماع"))
        .await
        .unwrap();
    assert_eq!(created.record.date, today());

    let mut changed = created.record.clone();
    changed.status = "تم التعاقد".to_string();
    service.update(&created.id, changed).await.unwrap();

    let listed = service.list(&StoreFilter::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].record.status, "تم التعاقد");

    service.delete(&created.id).await.unwrap();
    assert!(service
        .list(&StoreFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_create_requires_fields() {
    let (_, service) = memory_service();

    for bad in [
        record("", "سردا", "اجتماع"),
        record("Bakery", "", "اجتماع"),
        record("Bakery", "سردا", ""),
        record("Bakery", "سردا", "pending"),
    ] {
        assert!(matches!(
            service.create(bad).await,
            Err(StoresError::Validation(_))
        ));
    }
}

#[tokio::test]
async fn test_create_requires_known_location() {
    let (_, service) = memory_service();

    let result = service.create(record("Bakery", "Atlantis", "اجتماع")).await;
    assert!(matches!(result, Err(StoresError::Validation(_))));

    service.add_location("Atlantis").await.unwrap();
    assert!(service
        .create(record("Bakery", "Atlantis", "اجتماع"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (_, service) = memory_service();
    let result = service
        .update("missing", record("Bakery", "سردا", "اجتماع"))
        .await;
    assert!(matches!(result, Err(StoresError::NotFound(_))));
}

#[tokio::test]
async fn test_list_filters() {
    let (_, service) = memory_service();
    service
        .create(record("Corner Market", "سردا", "اجتماع"))
        .await
        .unwrap();
    service
        .create(record("Bakery", "بيرزيت", "اجتماع"))
        .await
        .unwrap();
    service
        .create(record("Market Two", "بيرزيت", "مرفوض"))
        .await
        .unwrap();

    let by_location = StoreFilter {
        location: Some("بيرزيت".to_string()),
        ..StoreFilter::default()
    };
    assert_eq!(service.list(&by_location).await.unwrap().len(), 2);

    let combined = StoreFilter {
        location: Some("بيرزيت".to_string()),
        status: Some("مرفوض".to_string()),
        search: None,
    };
    let found = service.list(&combined).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].record.store_name, "Market Two");

    let search = StoreFilter {
        search: Some("MARKET".to_string()),
        ..StoreFilter::default()
    };
    assert_eq!(service.list(&search).await.unwrap().len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// LOCATIONS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_locations_start_with_seed() {
    let (_, service) = memory_service();
    let set = service.locations().await.unwrap();
    assert_eq!(
        set.to_vec(),
        SEED_LOCATIONS.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_add_location_appends_once() {
    let (store, service) = memory_service();

    let set = service.add_location("نابلس").await.unwrap();
    assert_eq!(set.len(), SEED_LOCATIONS.len() + 1);
    assert_eq!(set.iter().last(), Some("نابلس"));

    service.add_location("نابلس").await.unwrap();
    service.add_location(SEED_LOCATIONS[0]).await.unwrap();
    assert_eq!(store.list_all("locations").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_blank_location_rejected() {
    let (_, service) = memory_service();
    assert!(matches!(
        service.add_location("  ").await,
        Err(StoresError::Validation(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT / IMPORT
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_export_is_dated_and_filtered() {
    let (_, service) = memory_service();
    service
        .create(record("Bakery", "سردا", "اجتماع"))
        .await
        .unwrap();

    let file = service.export(&StoreFilter::default()).await.unwrap();
    assert_eq!(file.file_name, StoreExporter::file_name(&today()));
    assert!(!file.bytes.is_empty());
}

#[tokio::test]
async fn test_import_appends_every_row() {
    let (_, service) = memory_service();
    let existing = service
        .create(record("Bakery", "سردا", "اجتماع"))
        .await
        .unwrap();
    let file = service.export(&StoreFilter::default()).await.unwrap();

    let report = service.import(file.bytes).await.unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 0);

    let all = service.list(&StoreFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|e| e.id != existing.id && e.record == existing.record));
}

#[tokio::test]
async fn test_import_header_only_is_no_valid_data() {
    let (store, service) = memory_service();
    let bytes = StoreExporter::new(Vec::new()).to_buffer().unwrap();

    let result = service.import(bytes).await;
    assert!(matches!(result, Err(StoresError::NoValidData { skipped: 0 })));
    assert!(store.list_all(STORES_COLLECTION).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_garbage_persists_nothing() {
    let (store, service) = memory_service();

    let result = service.import(b"PK\x03\x04 broken".to_vec()).await;
    assert!(matches!(result, Err(StoresError::Parse(_))));
    assert!(store.list_all(STORES_COLLECTION).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_partial_failure_reports_persistence_error() {
    let bytes = StoreExporter::new(vec![
        record("A", "سردا", "اجتماع"),
        record("B", "سردا", "اجتماع"),
        record("C", "سردا", "اجتماع"),
    ])
    .to_buffer()
    .unwrap();

    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(),
        allowed: 2,
        creates: AtomicUsize::new(0),
    });
    let service = StoresService::new(store.clone());

    let result = service.import(bytes).await;
    assert!(matches!(result, Err(StoresError::Persistence(_))));
    // Writes that succeeded stay written
    assert_eq!(
        store.inner.list_all(STORES_COLLECTION).await.unwrap().len(),
        2
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// YAML STORE
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_yaml_store_keeps_every_concurrent_import_row() {
    let dir = TempDir::new().unwrap();
    let service = StoresService::new(Arc::new(YamlStore::open(dir.path()).unwrap()));
    let records: Vec<StoreRecord> = (0..25)
        .map(|i| record(&format!("Store {}", i), "سردا", "اجتماع"))
        .collect();
    let bytes = StoreExporter::new(records).to_buffer().unwrap();

    let report = service.import(bytes).await.unwrap();
    assert_eq!(report.imported, 25);

    let reopened = StoresService::new(Arc::new(YamlStore::open(dir.path()).unwrap()));
    let all = reopened.list(&StoreFilter::default()).await.unwrap();
    assert_eq!(all.len(), 25);
    assert!(all.iter().any(|e| e.record.store_name == "Store 24"));
}

#[tokio::test]
async fn test_yaml_store_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let service = StoresService::new(Arc::new(YamlStore::open(dir.path()).unwrap()));
        service.add_location("نابلس").await.unwrap();
        service
            .create(record("Bakery", "نابلس", "مرفوض"))
            .await
            .unwrap();
    }

    let service = StoresService::new(Arc::new(YamlStore::open(dir.path()).unwrap()));
    let all = service.list(&StoreFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].record.location, "نابلس");
    assert!(service.locations().await.unwrap().contains("نابلس"));
}
