//! CLI command handlers

pub mod commands;

pub use commands::{
    add, add_location, delete, export, import, list, locations, statuses, update, StoreArgs,
};
