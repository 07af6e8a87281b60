//! Authentication subcommand handlers.
//!
//! Covers `rbconnect auth test`, which performs a live API call with the
//! saved settings, and `rbconnect auth show`, which prints the resolved
//! settings with secrets masked.

use std::process;

use clap::Subcommand;

use crate::color::ColorScheme;
use crate::config::ConfigurationStore;
use crate::credentials::Credential;
use crate::reviewboard::{RbApi, RbClient};

/// Authentication subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
  /// Validate the saved settings against the server
  Test {
    /// Request timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECONDS")]
    timeout: u64,
  },

  /// Show the resolved connection settings with secrets masked
  Show,
}

/// Dispatch the authentication subcommands defined under `rbconnect auth`.
///
/// # Arguments
/// * `subcommand` - Auth-specific variant to execute.
/// * `store` - Configuration store over the settings file and the keyring.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) async fn handle_auth_command(subcommand: &AuthCommand, store: &mut ConfigurationStore, colors: &ColorScheme) {
  match subcommand {
    AuthCommand::Test { timeout } => {
      // The test runs against this owned snapshot; edits made while the
      // request is in flight cannot race it.
      let configuration = store.load();

      if !configuration.is_valid() {
        eprintln!(
          "{} {}",
          colors.error("✗"),
          colors.error("Connection information provided is invalid.")
        );
        eprintln!("\n{}", colors.info("Run rbconnect configure to set up the connection:"));
        eprintln!("  rbconnect configure --url https://reviews.example.com --username you --password ...");
        eprintln!("  rbconnect configure --url https://reviews.example.com --use-token --token ...");
        process::exit(1);
      }

      let credential = match configuration.create_credentials() {
        Ok(credential) => credential,
        Err(e) => {
          // Settings changed between the validity gate and now.
          eprintln!("{} {}", colors.error("✗"), colors.error(e));
          process::exit(1);
        }
      };

      let url = configuration.url.clone().unwrap_or_default();
      println!("{} {}", colors.info("→"), colors.info("Testing connection"));
      println!("  {}: {}", colors.emphasis("URL"), colors.link(&url));

      let client = match RbClient::new(&url, credential, *timeout) {
        Ok(client) => client,
        Err(e) => {
          eprintln!("{} {}", colors.error("✗"), colors.error("Failed to create API client"));
          eprintln!("  {e:#}");
          process::exit(1);
        }
      };

      println!("\n{} {}", colors.info("→"), colors.info("Calling the Review Board API..."));
      match client.test_connection().await {
        Ok(server) => {
          println!("\n{} {}", colors.success("✓"), colors.success("Connection successful!"));
          println!(
            "  {}: {} {}",
            colors.emphasis("Server"),
            server.product.name,
            colors.number(server.product.version)
          );
        }
        Err(e) => {
          eprintln!("\n{} {}", colors.error("✗"), colors.error("Connection failed"));
          eprintln!("  {e:#}");
          eprintln!("\n{}", colors.info("Common issues:"));
          eprintln!("  1. Wrong server URL - should be the Review Board root, e.g. https://reviews.example.com");
          eprintln!("  2. Invalid password or API token - update with rbconnect configure");
          eprintln!("  3. Network connectivity issues");
          process::exit(2);
        }
      }
    }

    AuthCommand::Show => {
      let configuration = store.load();

      println!("{}", colors.emphasis("Review Board connection:"));
      println!(
        "  {}: {}",
        colors.emphasis("URL"),
        configuration
          .url
          .as_deref()
          .map(|url| colors.link(url))
          .unwrap_or_else(|| colors.dimmed("(not set)"))
      );

      let mode = if configuration.token_mode() {
        "API token"
      } else {
        "username/password"
      };
      println!("  {}: {}", colors.emphasis("Authentication"), mode);
      println!(
        "  {}: {}",
        colors.emphasis("Username"),
        configuration
          .username
          .as_deref()
          .unwrap_or("(not set)")
      );
      println!("  {}: {}", colors.emphasis("Password"), mask(&configuration.password, colors));
      println!("  {}: {}", colors.emphasis("API token"), mask(&configuration.token, colors));

      let use_rbt = configuration.use_rbt.unwrap_or(false);
      println!("  {}: {}", colors.emphasis("Use rbt"), if use_rbt { "yes" } else { "no" });
      if use_rbt {
        println!(
          "  {}: {}",
          colors.emphasis("rbt path"),
          configuration
            .rbt_path
            .as_deref()
            .map(|path| colors.path(path))
            .unwrap_or_else(|| colors.dimmed("(rbt on PATH)"))
        );
        if let Ok(credential) = configuration.create_credentials() {
          println!(
            "  {}: {}",
            colors.emphasis("rbt arguments"),
            colors.code(masked_arguments(&credential).join(" "))
          );
        }
      }

      let validity = if configuration.is_valid() {
        colors.success("valid")
      } else {
        colors.warning("incomplete")
      };
      println!("  {}: {}", colors.emphasis("Status"), validity);
    }
  }
}

/// Render a secret field as present-but-masked or absent.
fn mask(secret: &Option<String>, colors: &ColorScheme) -> String {
  match secret {
    Some(_) => "********".to_string(),
    None => colors.dimmed("(not set)"),
  }
}

/// The credential's rbt argument list with secret values replaced.
fn masked_arguments(credential: &Credential) -> Vec<String> {
  let mut masked = Vec::new();
  let mut hide_next = false;

  for argument in credential.command_line_arguments() {
    if hide_next {
      masked.push("********".to_string());
      hide_next = false;
      continue;
    }
    hide_next = matches!(argument.as_str(), "--password" | "--api-token");
    masked.push(argument);
  }

  masked
}
