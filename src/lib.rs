//! Stores Admin - store records with colour-coded Excel import/export
//!
//! This library backs a store-management admin screen: store records kept in
//! a document store, a filtered listing, a growable set of locations, and
//! bulk import/export against .xlsx files where each row's fill colour
//! encodes the store's status.
//!
//! # Features
//!
//! - Status ↔ colour registry with legacy import colours
//! - Styled .xlsx export (one filled row per store)
//! - .xlsx import reading status from the first cell's fill
//! - YAML-file and in-memory document stores
//! - CLI (`stores`) and HTTP API (`stores-server`)
//!
//! # Example
//!
//! ```no_run
//! use stores_admin::service::StoresService;
//! use stores_admin::store::YamlStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> stores_admin::StoresResult<()> {
//! let service = StoresService::new(Arc::new(YamlStore::open("stores-data")?));
//! let bytes = std::fs::read("stores.xlsx")?;
//! let report = service.import(bytes).await?;
//!
//! println!("Imported: {}", report.imported);
//! println!("Skipped: {}", report.skipped);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod locations;
pub mod service;
pub mod status;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StoresError, StoresResult};
pub use status::{color_for_status, status_for_color, Status};
pub use types::{ImportReport, StoreEntry, StoreFilter, StoreRecord};
