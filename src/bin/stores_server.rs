//! Stores API Server binary
//!
//! HTTP REST API for the store admin screen.
//! Provides store, location, export, import endpoints.

use clap::Parser;
use std::path::PathBuf;
use stores_admin::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "stores-server")]
#[command(version)]
#[command(about = "Stores API Server - HTTP REST API for store records and Excel import/export")]
#[command(long_about = r#"
Stores API Server - HTTP REST API

Provides RESTful endpoints for the store admin screen:
  - GET    /api/v1/stores      - List stores (?location=&status=&search=)
  - POST   /api/v1/stores      - Create a store
  - PUT    /api/v1/stores/:id  - Update a store
  - DELETE /api/v1/stores/:id  - Delete a store
  - GET    /api/v1/locations   - List locations
  - POST   /api/v1/locations   - Add a location
  - GET    /api/v1/statuses    - Statuses and colours
  - GET    /api/v1/export      - Download stores as .xlsx
  - POST   /api/v1/import      - Upload an .xlsx body

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  stores-server                           # Start on localhost:8080
  stores-server --host 0.0.0.0 --port 3000 --data-dir /var/lib/stores

  curl -X POST http://localhost:8080/api/v1/import \
    --data-binary @stores.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "STORES_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "STORES_PORT")]
    port: u16,

    /// Directory holding the document store files
    #[arg(long, default_value = "stores-data", env = "STORES_DATA_DIR")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        data_dir: args.data_dir,
    };

    run_api_server(config).await
}
