//! Connection settings for a Review Board server.
//!
//! The [`Configuration`] record owns validation and credential construction;
//! [`ConfigurationStore`] owns the save/load/clear lifecycle that splits the
//! record across two backends: a plain settings blob for the non-secret
//! fields and the secret store for the password and API token.
//!
//! Validation and credential construction are deliberately storage-free so
//! editing flows can poll [`Configuration::is_valid`] cheaply and unit tests
//! need no backends at all.

mod persistence;
mod settings;
mod store;

pub use persistence::{JsonFileSettings, MemorySettings, PersistedSettings, SettingsPersistence};
pub use settings::{Configuration, InvalidConfiguration};
pub use store::ConfigurationStore;
