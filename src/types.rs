use crate::error::{StoresError, StoresResult};
use crate::status::Status;
use serde::{Deserialize, Serialize};

//==============================================================================
// Store Records
//==============================================================================

/// Today's local date as `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// A store as it is stored in the `stores` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreRecord {
    pub store_name: String,
    pub employee_name: String,
    pub manager_name: String,
    pub store_phone: String,
    pub manager_phone: String,
    pub location: String,
    pub address: String,
    pub status: String,
    pub status_note: String,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
}

impl Default for StoreRecord {
    fn default() -> Self {
        Self {
            store_name: String::new(),
            employee_name: String::new(),
            manager_name: String::new(),
            store_phone: String::new(),
            manager_phone: String::new(),
            location: String::new(),
            address: String::new(),
            status: String::new(),
            status_note: String::new(),
            date: today(),
        }
    }
}

impl StoreRecord {
    /// Create a record with the three required fields set
    pub fn new(
        store_name: impl Into<String>,
        location: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            location: location.into(),
            status: status.into(),
            ..Self::default()
        }
    }

    /// Field values in export column order
    pub fn fields(&self) -> [&str; 10] {
        [
            &self.store_name,
            &self.employee_name,
            &self.manager_name,
            &self.store_phone,
            &self.manager_phone,
            &self.location,
            &self.address,
            &self.status,
            &self.status_note,
            &self.date,
        ]
    }

    /// The status if it is one of the six known labels, otherwise empty
    pub fn normalized_status(&self) -> &str {
        match Status::from_label(&self.status) {
            Some(status) => status.label(),
            None => "",
        }
    }

    /// Required-field check used before create/update
    pub fn validate(&self) -> StoresResult<()> {
        let mut missing = Vec::new();
        if self.store_name.trim().is_empty() {
            missing.push("storeName");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if self.normalized_status().is_empty() {
            missing.push("status");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StoresError::Validation(format!(
                "Required fields missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// A persisted store: record plus the id assigned by the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub id: String,
    #[serde(flatten)]
    pub record: StoreRecord,
}

//==============================================================================
// Listing Filters
//==============================================================================

/// Table filters. Empty values match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreFilter {
    pub location: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl StoreFilter {
    pub fn matches(&self, record: &StoreRecord) -> bool {
        let location_match = match self.location.as_deref() {
            Some(location) if !location.is_empty() => record.location == location,
            _ => true,
        };
        let status_match = match self.status.as_deref() {
            Some(status) if !status.is_empty() => record.status == status,
            _ => true,
        };
        let search_match = match self.search.as_deref() {
            Some(text) if !text.is_empty() => {
                let needle = text.to_lowercase();
                [
                    &record.store_name,
                    &record.employee_name,
                    &record.manager_name,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        };

        location_match && status_match && search_match
    }
}

//==============================================================================
// Import / Export Results
//==============================================================================

/// Outcome of a successful bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// An encoded workbook ready to be saved or downloaded
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
