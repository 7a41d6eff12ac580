//! Stores API Server module
//!
//! Provides the HTTP REST API behind the admin screen.
//! Run with `stores-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server};
