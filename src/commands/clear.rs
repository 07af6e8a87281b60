//! `rbconnect clear` - remove stored secrets and saved settings.

use std::process;

use crate::color::ColorScheme;
use crate::config::ConfigurationStore;

/// Delete the secrets stored for the saved server/identity pair, then remove
/// the settings file itself.
///
/// # Arguments
/// * `store` - Configuration store over the settings file and the keyring.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) fn handle_clear_command(store: &mut ConfigurationStore, colors: &ColorScheme) {
  // Load first so the secret keys can be derived from the saved pair.
  store.load();

  if let Err(e) = store.reset() {
    eprintln!("{} {}", colors.error("✗"), colors.error("Failed to remove saved settings"));
    eprintln!("  {e:#}");
    process::exit(1);
  }

  println!(
    "{} {}",
    colors.success("✓"),
    colors.success("Stored secrets and settings removed")
  );
}
