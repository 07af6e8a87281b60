//! The connection settings record and its validation rules.

use std::fmt;

use super::persistence::PersistedSettings;
use crate::credentials::Credential;

/// Connection settings for a Review Board server.
///
/// Exactly one identity field-set is authoritative, selected by `use_token`:
/// username/password when unset or `false`, the API token when `true`. The
/// inactive field-set is semantically inert even if populated.
///
/// `use_rbt` and `rbt_path` are orthogonal to authentication; they control
/// whether review operations go through the external `rbt` tool.
///
/// Equality and hashing are structural over all seven fields, secrets
/// included, so the editing flow can detect no-op edits by comparing the
/// edited copy against the last-loaded one.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Configuration {
  /// Server base address, e.g. `https://reviews.example.com`.
  pub url: Option<String>,
  /// Account name; required in username/password mode.
  pub username: Option<String>,
  /// Account password; required in username/password mode. Never persisted
  /// outside the secret store.
  pub password: Option<String>,
  /// API token; required in token mode. Never persisted outside the secret
  /// store.
  pub token: Option<String>,
  /// Selects the authoritative identity field-set.
  pub use_token: Option<bool>,
  /// Whether to drive reviews through the external `rbt` tool.
  pub use_rbt: Option<bool>,
  /// Path to the `rbt` executable.
  pub rbt_path: Option<String>,
}

/// True when the field is unset or holds an empty string.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
  value.as_deref().is_none_or(str::is_empty)
}

/// The field's value when it is set and non-empty.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}

impl Configuration {
  /// Whether the API token is the authoritative identity field-set.
  pub fn token_mode(&self) -> bool {
    self.use_token.unwrap_or(false)
  }

  /// Check that every field required by the selected authentication mode is
  /// present and non-empty.
  ///
  /// This is the cheap gate UI flows poll repeatedly; it never fails with an
  /// error and has no side effects.
  pub fn is_valid(&self) -> bool {
    if is_blank(&self.url) {
      return false;
    }

    if self.token_mode() {
      !is_blank(&self.token)
    } else {
      !is_blank(&self.username) && !is_blank(&self.password)
    }
  }

  /// Build the credential for the currently authoritative identity field-set.
  ///
  /// Callers are expected to gate on [`is_valid`](Self::is_valid) first; the
  /// presence checks here are a defensive double-check against mutation
  /// between the two calls.
  ///
  /// # Errors
  /// Returns [`InvalidConfiguration`] when any field the selected mode
  /// requires is missing or empty, exactly when `is_valid()` is `false`.
  pub fn create_credentials(&self) -> Result<Credential, InvalidConfiguration> {
    if is_blank(&self.url) {
      return Err(InvalidConfiguration);
    }

    if self.token_mode() {
      match non_blank(&self.token) {
        Some(token) => Ok(Credential::ApiToken {
          token: token.to_string(),
        }),
        None => Err(InvalidConfiguration),
      }
    } else {
      match (non_blank(&self.username), non_blank(&self.password)) {
        (Some(username), Some(password)) => Ok(Credential::UsernamePassword {
          username: username.to_string(),
          password: password.to_string(),
        }),
        _ => Err(InvalidConfiguration),
      }
    }
  }

  /// The non-secret subset of these settings, suitable for the settings blob.
  pub fn non_secret(&self) -> PersistedSettings {
    PersistedSettings {
      url: self.url.clone(),
      username: self.username.clone(),
      use_token: self.use_token,
      use_rbt: self.use_rbt,
      rbt_path: self.rbt_path.clone(),
    }
  }

  /// Rebuild a configuration from the settings blob; secret fields start
  /// absent and are filled in from the secret store by the caller.
  pub fn from_persisted(persisted: PersistedSettings) -> Self {
    Self {
      url: persisted.url,
      username: persisted.username,
      password: None,
      token: None,
      use_token: persisted.use_token,
      use_rbt: persisted.use_rbt,
      rbt_path: persisted.rbt_path,
    }
  }
}

// Secrets stay out of Debug output; log lines routinely format whole
// configurations.
impl fmt::Debug for Configuration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Configuration")
      .field("url", &self.url)
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("token", &self.token.as_ref().map(|_| "<redacted>"))
      .field("use_token", &self.use_token)
      .field("use_rbt", &self.use_rbt)
      .field("rbt_path", &self.rbt_path)
      .finish()
  }
}

/// Error raised when credential construction finds the identity fields the
/// selected mode requires missing or empty.
///
/// Only [`Configuration::create_credentials`] produces this;
/// [`Configuration::is_valid`] reports the same condition as a plain boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidConfiguration;

impl fmt::Display for InvalidConfiguration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Review Board connection is not configured properly")
  }
}

impl std::error::Error for InvalidConfiguration {}
