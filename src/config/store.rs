//! Save/load/clear coordination between the settings blob and the secret
//! store.
//!
//! The password and API token never enter the settings blob; they live in a
//! [`SecretStore`] under keys derived from the server URL and username. The
//! save sequence first clears the secrets of the previously loaded
//! server/identity pair, then writes the new ones, so reconfiguring the
//! server or account never leaves an orphaned secret behind under a stale
//! key.
//!
//! Secret backend failures are absorbed here: a failed fetch degrades to
//! "secret absent" and a failed write is logged. A user locked out of the
//! keyring can still edit and test settings by re-entering credentials.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use super::persistence::{PersistedSettings, SettingsPersistence};
use super::settings::{Configuration, non_blank};
use crate::secrets::SecretStore;

/// Secret key addressing the API token for `url`.
///
/// The format is a storage contract; changing it strands previously saved
/// tokens.
fn token_key(url: &str) -> String {
  format!("token for {url}")
}

/// Secret key addressing the password of `username` on `url`.
///
/// Same storage contract caveat as [`token_key`].
fn password_key(username: &str, url: &str) -> String {
  format!("{username} at {url}")
}

/// Coordinates the in-memory [`Configuration`] with its two storage
/// backends: the non-secret settings blob and the secret store.
///
/// The store tracks the last-loaded configuration so a later save knows which
/// server/identity pair's secrets to retire. It is not internally
/// synchronized; one editing flow drives it at a time.
pub struct ConfigurationStore {
  persistence: Arc<dyn SettingsPersistence>,
  secrets: Arc<dyn SecretStore>,
  state: Configuration,
}

impl ConfigurationStore {
  /// Create a store over the given backends, starting from an empty
  /// configuration.
  pub fn new(persistence: Arc<dyn SettingsPersistence>, secrets: Arc<dyn SecretStore>) -> Self {
    Self {
      persistence,
      secrets,
      state: Configuration::default(),
    }
  }

  /// The currently loaded configuration.
  pub fn state(&self) -> &Configuration {
    &self.state
  }

  /// Load the configuration: non-secret fields from the settings blob, then
  /// secrets from the secret store.
  ///
  /// Never fails. An unreadable blob degrades to an empty configuration and
  /// an unavailable secret backend leaves the secret fields absent; both are
  /// logged.
  ///
  /// # Returns
  /// An owned snapshot of the loaded configuration.
  pub fn load(&mut self) -> Configuration {
    let persisted = match self.persistence.load() {
      Ok(Some(settings)) => settings,
      Ok(None) => PersistedSettings::default(),
      Err(error) => {
        warn!("could not read saved settings, starting empty: {error:#}");
        PersistedSettings::default()
      }
    };

    self.state = Configuration::from_persisted(persisted);
    self.fetch_secrets();
    self.state.clone()
  }

  /// Persist `new` as the active configuration.
  ///
  /// Runs the three-step sequence that keeps secrets consistent across
  /// reconfiguration:
  ///
  /// 1. clear the secrets of the currently loaded server/identity pair;
  /// 2. store the new configuration's secrets under the new pair, deleting
  ///    keys whose secret is absent so nothing stale lingers;
  /// 3. write the non-secret blob, adopt `new` as the live state, and
  ///    re-fetch the secrets so memory reflects exactly what storage
  ///    returns.
  ///
  /// Secret backend failures are logged and absorbed.
  ///
  /// # Errors
  /// Returns an error only when the non-secret settings blob cannot be
  /// written.
  pub fn save(&mut self, new: &Configuration) -> Result<()> {
    self.delete_secrets_of(&self.state);
    self.store_secrets_of(new);

    self.persistence.save(&new.non_secret())?;
    self.state = new.clone();
    self.fetch_secrets();

    Ok(())
  }

  /// Delete both secrets of the currently loaded server/identity pair and
  /// drop them from the in-memory state.
  ///
  /// Missing keys and backend failures are tolerated; clearing never fails.
  pub fn clear(&mut self) {
    self.delete_secrets_of(&self.state);
    self.state.password = None;
    self.state.token = None;
  }

  /// Remove everything: the pair's secrets and the settings blob.
  ///
  /// # Errors
  /// Returns an error only when the settings blob cannot be removed.
  pub fn reset(&mut self) -> Result<()> {
    self.clear();
    self.persistence.clear()?;
    self.state = Configuration::default();
    Ok(())
  }

  /// Merge secrets from the store into the in-memory state.
  ///
  /// Without a URL there is nothing to scope a secret to, so no store
  /// operation runs at all; without a username only the token key applies.
  /// A fetch failure leaves the field absent.
  fn fetch_secrets(&mut self) {
    let Some(url) = non_blank(&self.state.url).map(str::to_string) else {
      return;
    };

    self.state.token = match self.secrets.get(&token_key(&url)) {
      Ok(token) => token,
      Err(error) => {
        warn!("could not read the API token from the secret store: {error}");
        None
      }
    };

    let Some(username) = non_blank(&self.state.username).map(str::to_string) else {
      return;
    };

    self.state.password = match self.secrets.get(&password_key(&username, &url)) {
      Ok(password) => password,
      Err(error) => {
        warn!("could not read the password for {username} from the secret store: {error}");
        None
      }
    };
  }

  /// Write `config`'s secrets under its own server/identity keys.
  ///
  /// A present secret is stored; an absent one deletes the key, so an old
  /// secret never survives under a key whose non-secret fields were just
  /// re-saved without it.
  fn store_secrets_of(&self, config: &Configuration) {
    let Some(url) = non_blank(&config.url) else {
      return;
    };

    let key = token_key(url);
    let result = match non_blank(&config.token) {
      Some(token) => self.secrets.set(&key, token),
      None => self.secrets.delete(&key),
    };
    if let Err(error) = result {
      warn!("could not store the API token: {error}");
    }

    let Some(username) = non_blank(&config.username) else {
      return;
    };

    let key = password_key(username, url);
    let result = match non_blank(&config.password) {
      Some(password) => self.secrets.set(&key, password),
      None => self.secrets.delete(&key),
    };
    if let Err(error) = result {
      warn!("could not store the password for {username}: {error}");
    }
  }

  /// Delete the secrets stored under `config`'s server/identity keys.
  fn delete_secrets_of(&self, config: &Configuration) {
    let Some(url) = non_blank(&config.url) else {
      return;
    };

    if let Err(error) = self.secrets.delete(&token_key(url)) {
      warn!("could not delete the API token: {error}");
    }

    if let Some(username) = non_blank(&config.username)
      && let Err(error) = self.secrets.delete(&password_key(username, url))
    {
      warn!("could not delete the password for {username}: {error}");
    }

    debug!(url, "cleared stored secrets");
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::super::persistence::MemorySettings;
  use super::*;
  use crate::secrets::MemorySecretStore;

  fn store_with(
    persistence: Arc<MemorySettings>,
    secrets: Arc<MemorySecretStore>,
  ) -> ConfigurationStore {
    ConfigurationStore::new(persistence, secrets)
  }

  fn password_config(url: &str) -> Configuration {
    Configuration {
      url: Some(url.to_string()),
      username: Some("alice".to_string()),
      password: Some("hunter2".to_string()),
      use_token: Some(false),
      use_rbt: Some(false),
      ..Configuration::default()
    }
  }

  #[test]
  fn test_secret_keys_are_exact() {
    assert_eq!(token_key("https://a"), "token for https://a");
    assert_eq!(password_key("alice", "https://a"), "alice at https://a");
  }

  #[test]
  fn test_save_then_load_round_trips() {
    let persistence = Arc::new(MemorySettings::new());
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(persistence.clone(), secrets.clone());

    let config = password_config("https://reviews.example.com");
    store.save(&config).unwrap();

    let mut reloaded = store_with(persistence, secrets);
    assert_eq!(reloaded.load(), config);
  }

  #[test]
  fn test_save_places_secrets_under_derived_keys() {
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(Arc::new(MemorySettings::new()), secrets.clone());

    let mut config = password_config("https://a");
    config.token = Some("tok".to_string());
    store.save(&config).unwrap();

    assert_eq!(secrets.stored_keys(), vec!["alice at https://a", "token for https://a"]);
  }

  #[test]
  fn test_changing_server_leaves_no_secret_under_old_keys() {
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(Arc::new(MemorySettings::new()), secrets.clone());

    store.save(&password_config("https://a")).unwrap();
    store.save(&password_config("https://b")).unwrap();

    assert_eq!(secrets.get("alice at https://a").unwrap(), None);
    assert_eq!(secrets.get("token for https://a").unwrap(), None);
    assert_eq!(secrets.get("alice at https://b").unwrap().as_deref(), Some("hunter2"));
  }

  #[test]
  fn test_absent_secret_deletes_instead_of_storing() {
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set("token for https://a", "stale").unwrap();

    let mut store = store_with(Arc::new(MemorySettings::new()), secrets.clone());
    let mut config = password_config("https://a");
    config.token = None;
    store.save(&config).unwrap();

    assert_eq!(secrets.get("token for https://a").unwrap(), None);
  }

  #[test]
  fn test_no_url_means_no_secret_operations() {
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(Arc::new(MemorySettings::new()), secrets.clone());

    let config = Configuration {
      token: Some("tok".to_string()),
      use_token: Some(true),
      ..Configuration::default()
    };
    store.save(&config).unwrap();

    // Without a server to scope them to, secrets are never written.
    assert!(secrets.stored_keys().is_empty());
  }

  #[test]
  fn test_no_username_touches_only_the_token_key() {
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(Arc::new(MemorySettings::new()), secrets.clone());

    let config = Configuration {
      url: Some("https://a".to_string()),
      token: Some("tok".to_string()),
      use_token: Some(true),
      ..Configuration::default()
    };
    store.save(&config).unwrap();

    assert_eq!(secrets.stored_keys(), vec!["token for https://a"]);
  }

  #[test]
  fn test_save_normalizes_state_from_storage() {
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(Arc::new(MemorySettings::new()), secrets.clone());

    store.save(&password_config("https://a")).unwrap();

    // Whatever is in memory after save is exactly what storage returns.
    assert_eq!(store.state().password.as_deref(), Some("hunter2"));
    secrets.set("alice at https://a", "rotated").unwrap();
    let reloaded = store.load();
    assert_eq!(reloaded.password.as_deref(), Some("rotated"));
  }

  #[test]
  fn test_unavailable_backend_degrades_to_absent_secrets() {
    let persistence = Arc::new(MemorySettings::with_settings(PersistedSettings {
      url: Some("https://a".to_string()),
      username: Some("alice".to_string()),
      use_token: Some(false),
      use_rbt: None,
      rbt_path: None,
    }));
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set_unavailable(true);

    let mut store = store_with(persistence, secrets);
    let config = store.load();

    assert_eq!(config.url.as_deref(), Some("https://a"));
    assert_eq!(config.username.as_deref(), Some("alice"));
    assert!(config.password.is_none());
    assert!(config.token.is_none());
  }

  #[test]
  fn test_save_survives_unavailable_secret_backend() {
    let persistence = Arc::new(MemorySettings::new());
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set_unavailable(true);

    let mut store = store_with(persistence.clone(), secrets);
    let config = password_config("https://a");
    store.save(&config).unwrap();

    // Non-secret fields still reach the blob.
    assert_eq!(persistence.load().unwrap(), Some(config.non_secret()));
  }

  #[test]
  fn test_clear_removes_both_secrets_and_keeps_settings() {
    let persistence = Arc::new(MemorySettings::new());
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(persistence.clone(), secrets.clone());

    let mut config = password_config("https://a");
    config.token = Some("tok".to_string());
    store.save(&config).unwrap();
    store.clear();

    assert!(secrets.stored_keys().is_empty());
    assert!(store.state().password.is_none());
    assert!(store.state().token.is_none());
    assert!(persistence.load().unwrap().is_some());
  }

  #[test]
  fn test_reset_removes_settings_blob_too() {
    let persistence = Arc::new(MemorySettings::new());
    let secrets = Arc::new(MemorySecretStore::new());
    let mut store = store_with(persistence.clone(), secrets.clone());

    store.save(&password_config("https://a")).unwrap();
    store.reset().unwrap();

    assert!(secrets.stored_keys().is_empty());
    assert_eq!(persistence.load().unwrap(), None);
    assert_eq!(store.state(), &Configuration::default());
  }
}
