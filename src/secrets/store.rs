//! The secret store contract and its error type.

use std::fmt;

/// A keyed store holding one secret string per key.
///
/// Implementations scope their keys to an opaque owner (for the system
/// keyring, a service name) that callers never inspect. A key with no stored
/// secret is an expected outcome, not an error: `get` returns `Ok(None)` and
/// `delete` is a no-op.
pub trait SecretStore {
  /// Fetch the secret stored under `key`.
  ///
  /// # Returns
  /// * `Ok(Some(secret))` when a secret exists under the key.
  /// * `Ok(None)` when nothing is stored under the key.
  ///
  /// # Errors
  /// Returns [`SecretStoreError::Unavailable`] when the backend cannot be
  /// reached.
  fn get(&self, key: &str) -> Result<Option<String>, SecretStoreError>;

  /// Store `secret` under `key`, replacing any previous value.
  ///
  /// # Errors
  /// Returns [`SecretStoreError::Unavailable`] when the backend cannot be
  /// reached.
  fn set(&self, key: &str, secret: &str) -> Result<(), SecretStoreError>;

  /// Remove the secret stored under `key`, if any.
  ///
  /// # Errors
  /// Returns [`SecretStoreError::Unavailable`] when the backend cannot be
  /// reached. A missing key is not an error.
  fn delete(&self, key: &str) -> Result<(), SecretStoreError>;
}

/// Errors that can occur during secret store operations.
///
/// The configuration layer absorbs these at its boundary: a failed fetch
/// degrades to "secret absent" and a failed write is logged, so backend
/// outages never block settings editing.
#[derive(Debug)]
pub enum SecretStoreError {
  /// The secret backend could not be reached or rejected the operation.
  Unavailable(String),
}

impl fmt::Display for SecretStoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unavailable(reason) => write!(f, "secret store unavailable: {reason}"),
    }
  }
}

impl std::error::Error for SecretStoreError {}
