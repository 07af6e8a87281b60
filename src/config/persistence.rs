//! Persistence of the non-secret settings blob.
//!
//! Only the fields of [`PersistedSettings`] ever reach disk; the password and
//! API token live exclusively in the secret store (see [`crate::secrets`])
//! and are merged back in by [`ConfigurationStore`](super::ConfigurationStore).

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The non-secret subset of [`Configuration`](super::Configuration).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSettings {
  /// Server base address.
  pub url: Option<String>,
  /// Account name. Stored here so the password secret key can be derived on
  /// the next load; the password itself is not part of this blob.
  pub username: Option<String>,
  /// Selects the authoritative identity field-set.
  pub use_token: Option<bool>,
  /// Whether to drive reviews through the external `rbt` tool.
  pub use_rbt: Option<bool>,
  /// Path to the `rbt` executable.
  pub rbt_path: Option<String>,
}

/// Storage backend for the non-secret settings blob.
///
/// Implementations hand the blob over already deserialized; callers never see
/// the on-disk representation.
pub trait SettingsPersistence {
  /// Load the saved settings.
  ///
  /// # Returns
  /// `Ok(None)` when nothing has been saved yet.
  ///
  /// # Errors
  /// Returns an error when a blob exists but cannot be read or decoded.
  fn load(&self) -> Result<Option<PersistedSettings>>;

  /// Replace the saved settings.
  fn save(&self, settings: &PersistedSettings) -> Result<()>;

  /// Remove the saved settings. Removing settings that were never saved is a
  /// no-op.
  fn clear(&self) -> Result<()>;
}

/// Settings blob stored as JSON under the platform configuration directory.
pub struct JsonFileSettings {
  path: PathBuf,
}

impl JsonFileSettings {
  /// Create a store rooted at the platform-standard configuration directory
  /// (e.g. `~/.config/rbconnect/settings.json` on Linux).
  ///
  /// # Errors
  /// Returns an error when no configuration directory can be determined for
  /// the current user.
  pub fn new() -> Result<Self> {
    let dirs = directories::ProjectDirs::from("", "", "rbconnect")
      .context("could not determine a configuration directory")?;

    Ok(Self {
      path: dirs.config_dir().join("settings.json"),
    })
  }

  /// Create a store backed by an explicit file path.
  pub fn at_path(path: PathBuf) -> Self {
    Self { path }
  }

  /// Location of the settings file.
  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl SettingsPersistence for JsonFileSettings {
  fn load(&self) -> Result<Option<PersistedSettings>> {
    if !self.path.exists() {
      return Ok(None);
    }

    let content = std::fs::read_to_string(&self.path)
      .with_context(|| format!("failed to read {}", self.path.display()))?;
    let settings = serde_json::from_str(&content)
      .with_context(|| format!("failed to parse {}", self.path.display()))?;

    Ok(Some(settings))
  }

  fn save(&self, settings: &PersistedSettings) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(&self.path, content).with_context(|| format!("failed to write {}", self.path.display()))?;

    tracing::debug!(path = %self.path.display(), "settings saved");
    Ok(())
  }

  fn clear(&self) -> Result<()> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(error) => Err(error).with_context(|| format!("failed to remove {}", self.path.display())),
    }
  }
}

/// In-memory settings store backing unit and integration tests.
#[derive(Debug, Default)]
pub struct MemorySettings {
  saved: Mutex<Option<PersistedSettings>>,
}

impl MemorySettings {
  /// Create an empty in-memory store.
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a store pre-populated with `settings`.
  pub fn with_settings(settings: PersistedSettings) -> Self {
    Self {
      saved: Mutex::new(Some(settings)),
    }
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Option<PersistedSettings>> {
    self.saved.lock().expect("settings mutex poisoned")
  }
}

impl SettingsPersistence for MemorySettings {
  fn load(&self) -> Result<Option<PersistedSettings>> {
    Ok(self.lock().clone())
  }

  fn save(&self, settings: &PersistedSettings) -> Result<()> {
    *self.lock() = Some(settings.clone());
    Ok(())
  }

  fn clear(&self) -> Result<()> {
    *self.lock() = None;
    Ok(())
  }
}
