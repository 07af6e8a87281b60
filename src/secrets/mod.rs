//! Keyed secret storage.
//!
//! This module provides a trait-based interface for storing single secret
//! strings under derived keys. The default implementation uses the operating
//! system keyring; an in-memory implementation backs tests.
//!
//! The configuration layer only ever stores the password and API token here,
//! keyed by server URL and username (see [`crate::config`]); everything else
//! goes through the plain settings blob.

mod memory;
mod store;
mod system;

pub use memory::MemorySecretStore;
pub use store::{SecretStore, SecretStoreError};
pub use system::SystemSecretStore;
