//! In-memory implementation of [`SecretStore`] used by tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{SecretStore, SecretStoreError};

/// A secret store backed by a hash map.
///
/// Besides normal operation it can be switched into an unavailable state
/// where every call fails, to exercise the degradation paths of the
/// configuration layer.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
  entries: Mutex<HashMap<String, String>>,
  unavailable: AtomicBool,
}

impl MemorySecretStore {
  /// Create an empty store.
  pub fn new() -> Self {
    Self::default()
  }

  /// Make every subsequent operation fail with
  /// [`SecretStoreError::Unavailable`].
  pub fn set_unavailable(&self, unavailable: bool) {
    self.unavailable.store(unavailable, Ordering::SeqCst);
  }

  /// Snapshot of the keys currently holding a secret.
  pub fn stored_keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.lock().keys().cloned().collect();
    keys.sort();
    keys
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    self.entries.lock().expect("secret store mutex poisoned")
  }

  fn check_available(&self) -> Result<(), SecretStoreError> {
    if self.unavailable.load(Ordering::SeqCst) {
      Err(SecretStoreError::Unavailable("simulated outage".to_string()))
    } else {
      Ok(())
    }
  }
}

impl SecretStore for MemorySecretStore {
  fn get(&self, key: &str) -> Result<Option<String>, SecretStoreError> {
    self.check_available()?;
    Ok(self.lock().get(key).cloned())
  }

  fn set(&self, key: &str, secret: &str) -> Result<(), SecretStoreError> {
    self.check_available()?;
    self.lock().insert(key.to_string(), secret.to_string());
    Ok(())
  }

  fn delete(&self, key: &str) -> Result<(), SecretStoreError> {
    self.check_available()?;
    self.lock().remove(key);
    Ok(())
  }
}
