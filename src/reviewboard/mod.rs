//! Minimal Review Board REST API surface.
//!
//! Only the slice the connection test needs: fetching server information
//! with the configured credential attached. Everything else about the API is
//! out of scope for this tool.

mod api;
mod client;
mod models;

pub use api::RbApi;
pub use client::RbClient;
pub use models::{InfoResponse, Product, ServerInfo};
