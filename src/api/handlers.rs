//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::server::AppState;
use crate::error::{StoresError, StoresResult};
use crate::status::Status;
use crate::types::{StoreFilter, StoreRecord};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for each error kind
pub fn error_status(error: &StoresError) -> StatusCode {
    match error {
        StoresError::Validation(_) => StatusCode::BAD_REQUEST,
        StoresError::Parse(_) => StatusCode::BAD_REQUEST,
        StoresError::NoWorksheet | StoresError::NoValidData { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        StoresError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: StoresResult<T>) -> Response {
    match result {
        Ok(data) => Json(ApiResponse::ok(data)).into_response(),
        Err(e) => (error_status(&e), Json(ApiResponse::<T>::err(e.to_string()))).into_response(),
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Stores API Server".to_string(),
        version: state.version.clone(),
        description: "Store records with colour-coded Excel import/export".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("GET", "/api/v1/stores", "List stores (location, status, search)"),
            EndpointInfo::new("POST", "/api/v1/stores", "Create a store"),
            EndpointInfo::new("PUT", "/api/v1/stores/:id", "Update a store"),
            EndpointInfo::new("DELETE", "/api/v1/stores/:id", "Delete a store"),
            EndpointInfo::new("GET", "/api/v1/locations", "List known locations"),
            EndpointInfo::new("POST", "/api/v1/locations", "Add a location"),
            EndpointInfo::new("GET", "/api/v1/statuses", "List statuses and colours"),
            EndpointInfo::new("GET", "/api/v1/export", "Download stores as Excel"),
            EndpointInfo::new("POST", "/api/v1/import", "Upload an Excel file of stores"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["stores", "locations", "export", "import"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }))
}

/// GET /api/v1/stores - List stores
pub async fn list_stores(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StoreFilter>,
) -> Response {
    respond(state.service.list(&filter).await)
}

/// POST /api/v1/stores - Create a store
pub async fn create_store(
    State(state): State<Arc<AppState>>,
    Json(record): Json<StoreRecord>,
) -> Response {
    respond(state.service.create(record).await)
}

/// PUT /api/v1/stores/:id - Replace a store's fields
pub async fn update_store(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(record): Json<StoreRecord>,
) -> Response {
    respond(state.service.update(&id, record).await)
}

/// Delete response
#[derive(Serialize, Default)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: String,
}

/// DELETE /api/v1/stores/:id - Delete a store
pub async fn delete_store(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = state.service.delete(&id).await.map(|()| DeleteResponse {
        deleted: true,
        id,
    });
    respond(result)
}

/// GET /api/v1/locations - Known locations
pub async fn list_locations(State(state): State<Arc<AppState>>) -> Response {
    respond(state.service.locations().await.map(|set| set.to_vec()))
}

/// Add-location request
#[derive(Deserialize)]
pub struct LocationRequest {
    pub name: String,
}

/// POST /api/v1/locations - Add a location
pub async fn add_location(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocationRequest>,
) -> Response {
    respond(state.service.add_location(&req.name).await.map(|set| set.to_vec()))
}

/// Status with its export colour
#[derive(Serialize)]
pub struct StatusInfo {
    pub label: String,
    pub color: String,
}

/// GET /api/v1/statuses - Statuses and their colours
pub async fn list_statuses() -> impl IntoResponse {
    let statuses: Vec<StatusInfo> = Status::ALL
        .iter()
        .map(|s| StatusInfo {
            label: s.label().to_string(),
            color: s.color().to_string(),
        })
        .collect();
    Json(ApiResponse::ok(statuses))
}

/// GET /api/v1/export - Download the filtered stores as .xlsx
pub async fn export_excel(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StoreFilter>,
) -> Response {
    match state.service.export(&filter).await {
        Ok(file) => {
            let disposition = format!(
                "attachment; filename=\"stores.xlsx\"; filename*=UTF-8''{}",
                percent_encode(&file.file_name)
            );
            (
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                file.bytes,
            )
                .into_response()
        }
        Err(e) => respond::<()>(Err(e)),
    }
}

/// Import response
#[derive(Serialize, Default)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
    pub message: String,
}

/// POST /api/v1/import - Body is the raw .xlsx file
pub async fn import_excel(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = state
        .service
        .import(body.to_vec())
        .await
        .map(|report| ImportResponse {
            imported: report.imported,
            skipped: report.skipped,
            message: format!("Imported {} stores", report.imported),
        });
    respond(result)
}

/// RFC 5987 encoding for non-ASCII download names
fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ApiResponse Tests ====================

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());

        assert!(response.success);
        assert_eq!(response.data, Some("test data".to_string()));
        assert!(response.error.is_none());
        // Verify UUID format (8-4-4-4-12)
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<String> = ApiResponse::err("Something went wrong");

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_api_response_serializes_without_none_fields() {
        let response: ApiResponse<String> = ApiResponse::ok("data".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":\"data\""));
    }

    // ==================== Error Mapping Tests ====================

    #[test]
    fn test_import_conditions_map_to_distinct_errors() {
        assert_eq!(
            error_status(&StoresError::Parse("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&StoresError::NoWorksheet),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&StoresError::NoValidData { skipped: 2 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&StoresError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&StoresError::Persistence("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("stores_2025-01-01.xlsx"), "stores_2025-01-01.xlsx");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("م"), "%D9%85");
    }

    #[test]
    fn test_location_request_deserialize() {
        let req: LocationRequest = serde_json::from_str(r#"{"name": "نابلس"}"#).unwrap();
        assert_eq!(req.name, "نابلس");
    }

    #[test]
    fn test_import_response_default() {
        let response = ImportResponse::default();
        assert_eq!(response.imported, 0);
        assert_eq!(response.skipped, 0);
        assert!(response.message.is_empty());
    }
}
