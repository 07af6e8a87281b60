//! Settings editing flow for `rbconnect configure`.
//!
//! Loads the saved configuration, overlays the provided flags onto a scratch
//! copy, and saves only when the result is both changed and valid. An edit
//! that leaves every field as it was is discarded without touching either
//! storage backend.

use std::process;

use crate::cli::ConnectionOptions;
use crate::color::ColorScheme;
use crate::config::{Configuration, ConfigurationStore};

/// Apply the provided connection flags to the saved settings.
///
/// # Arguments
/// * `options` - Flags given on the command line; unset flags keep the saved
///   value.
/// * `store` - Configuration store over the settings file and the keyring.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) fn handle_configure_command(
  options: &ConnectionOptions,
  store: &mut ConfigurationStore,
  colors: &ColorScheme,
) {
  let current = store.load();
  let edited = apply_options(&current, options);

  if edited == current {
    println!("{} {}", colors.info("ℹ"), colors.info("Settings unchanged"));
    return;
  }

  if !edited.is_valid() {
    eprintln!(
      "{} {}",
      colors.error("✗"),
      colors.error("Connection information provided is invalid.")
    );
    describe_missing(&edited, colors);
    process::exit(1);
  }

  if let Err(e) = store.save(&edited) {
    eprintln!("{} {}", colors.error("✗"), colors.error("Failed to save settings"));
    eprintln!("  {e:#}");
    process::exit(1);
  }

  println!("{} {}", colors.success("✓"), colors.success("Settings saved"));
  if let Some(url) = &edited.url {
    println!("  {}: {}", colors.emphasis("Server"), colors.link(url));
  }
  let mode = if edited.token_mode() {
    "API token"
  } else {
    "username/password"
  };
  println!("  {}: {}", colors.emphasis("Authentication"), mode);
}

/// Overlay the provided flags onto the loaded configuration, then clear the
/// identity field-set the selected mode does not use so stale secrets are
/// not carried across a mode switch.
fn apply_options(current: &Configuration, options: &ConnectionOptions) -> Configuration {
  let mut edited = current.clone();

  if let Some(url) = &options.url {
    edited.url = Some(url.clone());
  }
  if let Some(username) = &options.username {
    edited.username = Some(username.clone());
  }
  if let Some(password) = &options.password {
    edited.password = Some(password.clone());
  }
  if let Some(token) = &options.token {
    edited.token = Some(token.clone());
  }
  if let Some(use_token) = options.use_token {
    edited.use_token = Some(use_token);
  }
  if let Some(use_rbt) = options.use_rbt {
    edited.use_rbt = Some(use_rbt);
  }
  if let Some(rbt_path) = &options.rbt_path {
    edited.rbt_path = Some(rbt_path.clone());
  }

  if edited.token_mode() {
    edited.username = None;
    edited.password = None;
  } else {
    edited.token = None;
  }

  edited
}

/// Point out which required fields are missing for the selected mode.
fn describe_missing(config: &Configuration, colors: &ColorScheme) {
  let mut missing = Vec::new();

  if config.url.as_deref().unwrap_or_default().is_empty() {
    missing.push("--url");
  }
  if config.token_mode() {
    if config.token.as_deref().unwrap_or_default().is_empty() {
      missing.push("--token");
    }
  } else {
    if config.username.as_deref().unwrap_or_default().is_empty() {
      missing.push("--username");
    }
    if config.password.as_deref().unwrap_or_default().is_empty() {
      missing.push("--password");
    }
  }

  eprintln!("\n{}", colors.info("Missing settings:"));
  for flag in missing {
    eprintln!("  {}", colors.code(flag));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn options() -> ConnectionOptions {
    ConnectionOptions {
      url: None,
      username: None,
      password: None,
      token: None,
      use_token: None,
      use_rbt: None,
      rbt_path: None,
    }
  }

  fn saved_password_config() -> Configuration {
    Configuration {
      url: Some("https://reviews.example.com".to_string()),
      username: Some("alice".to_string()),
      password: Some("hunter2".to_string()),
      use_token: Some(false),
      ..Configuration::default()
    }
  }

  #[test]
  fn test_no_flags_yield_identical_copy() {
    let current = saved_password_config();
    assert_eq!(apply_options(&current, &options()), current);
  }

  #[test]
  fn test_flags_overlay_saved_values() {
    let current = saved_password_config();
    let mut opts = options();
    opts.password = Some("rotated".to_string());

    let edited = apply_options(&current, &opts);
    assert_eq!(edited.password.as_deref(), Some("rotated"));
    assert_eq!(edited.username.as_deref(), Some("alice"));
    assert_eq!(edited.url, current.url);
  }

  #[test]
  fn test_switching_to_token_mode_clears_username_and_password() {
    let current = saved_password_config();
    let mut opts = options();
    opts.use_token = Some(true);
    opts.token = Some("tok".to_string());

    let edited = apply_options(&current, &opts);
    assert!(edited.username.is_none());
    assert!(edited.password.is_none());
    assert_eq!(edited.token.as_deref(), Some("tok"));
  }

  #[test]
  fn test_switching_to_password_mode_clears_token() {
    let current = Configuration {
      url: Some("https://reviews.example.com".to_string()),
      token: Some("tok".to_string()),
      use_token: Some(true),
      ..Configuration::default()
    };
    let mut opts = options();
    opts.use_token = Some(false);
    opts.username = Some("alice".to_string());
    opts.password = Some("hunter2".to_string());

    let edited = apply_options(&current, &opts);
    assert!(edited.token.is_none());
    assert!(edited.is_valid());
  }
}
