//! System keyring implementation of [`SecretStore`].

use keyring::Entry;

use super::{SecretStore, SecretStoreError};

/// Stores secrets in the operating system keyring.
///
/// Entries are scoped under a service name so they never collide with other
/// tools' keyring entries; the service name is opaque to the configuration
/// layer.
pub struct SystemSecretStore {
  service: String,
}

impl SystemSecretStore {
  /// Service name used for keyring entries.
  pub const DEFAULT_SERVICE: &'static str = "rbconnect";

  /// Create a store scoped under [`DEFAULT_SERVICE`](Self::DEFAULT_SERVICE).
  pub fn new() -> Self {
    Self::with_service(Self::DEFAULT_SERVICE)
  }

  /// Create a store scoped under a custom service name.
  pub fn with_service(service: impl Into<String>) -> Self {
    Self {
      service: service.into(),
    }
  }

  fn entry(&self, key: &str) -> Result<Entry, SecretStoreError> {
    Entry::new(&self.service, key).map_err(|error| SecretStoreError::Unavailable(error.to_string()))
  }
}

impl Default for SystemSecretStore {
  fn default() -> Self {
    Self::new()
  }
}

impl SecretStore for SystemSecretStore {
  fn get(&self, key: &str) -> Result<Option<String>, SecretStoreError> {
    match self.entry(key)?.get_password() {
      Ok(secret) => Ok(Some(secret)),
      Err(keyring::Error::NoEntry) => Ok(None),
      Err(error) => Err(SecretStoreError::Unavailable(error.to_string())),
    }
  }

  fn set(&self, key: &str, secret: &str) -> Result<(), SecretStoreError> {
    self
      .entry(key)?
      .set_password(secret)
      .map_err(|error| SecretStoreError::Unavailable(error.to_string()))
  }

  fn delete(&self, key: &str) -> Result<(), SecretStoreError> {
    match self.entry(key)?.delete_credential() {
      Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
      Err(error) => Err(SecretStoreError::Unavailable(error.to_string())),
    }
  }
}
