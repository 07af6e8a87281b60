//! Command-line interface definitions for rbconnect.
//!
//! This module defines the CLI structure using clap derives and owns the
//! top-level dispatch: parsing, tracing setup, and handing each subcommand to
//! its handler in [`crate::commands`].

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::color::ColorScheme;
use crate::commands::auth::{AuthCommand, handle_auth_command};
use crate::commands::clear::handle_clear_command;
use crate::commands::completions::{Shell, handle_completions_command};
use crate::commands::configure::handle_configure_command;
use crate::commands::version::handle_version_command;
use crate::config::{ConfigurationStore, JsonFileSettings};
use crate::secrets::SystemSecretStore;

/// rbconnect - Manage Review Board connection settings
#[derive(Debug, Parser)]
#[command(
  name = "rbconnect",
  version,
  about = "Manage Review Board connection settings",
  long_about = "A command-line tool for managing the connection to a Review Board server.\n\
                Stores the server URL and account settings in a plain settings file and\n\
                keeps the password or API token in the system keyring.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Edit and save the Review Board connection settings
  Configure {
    #[command(flatten)]
    connection: ConnectionOptions,
  },

  /// Authentication testing and inspection
  Auth {
    #[command(subcommand)]
    subcommand: AuthCommand,
  },

  /// Remove the stored secrets and the saved settings
  Clear,

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Normalize a URL by adding https:// if no scheme is present
fn normalize_url(url: &str) -> Result<String, String> {
  let trimmed = url.trim();

  // Try to parse the URL as-is
  let parsed = match Url::parse(trimmed) {
    Ok(parsed) => parsed,
    Err(_) => {
      // Failed to parse, likely missing scheme
      // Try prepending https://
      let with_https = format!("https://{trimmed}");
      Url::parse(&with_https).map_err(|e| format!("Invalid URL: {e}"))?
    }
  };

  // Convert to string and remove trailing slash if present
  let mut url_str = parsed.to_string();
  if url_str.ends_with('/') && url_str.len() > 1 {
    url_str.pop();
  }

  Ok(url_str)
}

/// Connection settings accepted by `rbconnect configure`.
///
/// Every flag is optional; flags that are not given leave the corresponding
/// saved setting untouched.
#[derive(Debug, Parser)]
pub struct ConnectionOptions {
  /// Review Board server URL
  #[arg(long, env = "RBCONNECT_URL", value_name = "URL", value_parser = normalize_url)]
  pub url: Option<String>,

  /// Account username (username/password mode)
  #[arg(long, env = "RBCONNECT_USERNAME", value_name = "NAME")]
  pub username: Option<String>,

  /// Account password (username/password mode)
  #[arg(long, env = "RBCONNECT_PASSWORD", value_name = "PASSWORD")]
  pub password: Option<String>,

  /// API token (token mode)
  #[arg(long, env = "RBCONNECT_TOKEN", value_name = "TOKEN")]
  pub token: Option<String>,

  /// Authenticate with an API token instead of username/password
  #[arg(
    long,
    value_name = "BOOL",
    default_missing_value = "true",
    action = clap::ArgAction::Set,
    num_args = 0..=1
  )]
  pub use_token: Option<bool>,

  /// Drive review operations through the external rbt tool
  #[arg(
    long,
    value_name = "BOOL",
    default_missing_value = "true",
    action = clap::ArgAction::Set,
    num_args = 0..=1
  )]
  pub use_rbt: Option<bool>,

  /// Path to the rbt executable
  #[arg(long, value_name = "PATH")]
  pub rbt_path: Option<String>,
}

impl ConnectionOptions {
  /// Whether no flag was provided at all.
  pub fn is_empty(&self) -> bool {
    self.url.is_none()
      && self.username.is_none()
      && self.password.is_none()
      && self.token.is_none()
      && self.use_token.is_none()
      && self.use_rbt.is_none()
      && self.rbt_path.is_none()
  }
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN", global = true)]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

impl Cli {
  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    match &self.command {
      Command::Configure { connection } if connection.is_empty() => {
        Err("provide at least one setting to change (see rbconnect configure --help)".to_string())
      }
      Command::Auth {
        subcommand: AuthCommand::Test { timeout },
      } if *timeout == 0 => Err("--timeout must be at least 1 second".to_string()),
      _ => Ok(()),
    }
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse();

  init_tracing(&cli.behavior);

  // Create color scheme based on user preference
  let colors = ColorScheme::new(cli.behavior.color);

  // Validate CLI arguments
  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Configure { connection } => {
      let mut store = open_store(&colors);
      handle_configure_command(connection, &mut store, &colors);
    }
    Command::Auth { subcommand } => {
      let mut store = open_store(&colors);
      handle_auth_command(subcommand, &mut store, &colors).await;
    }
    Command::Clear => {
      let mut store = open_store(&colors);
      handle_clear_command(&mut store, &colors);
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

/// Open the configuration store over the platform settings file and the
/// system keyring.
fn open_store(colors: &ColorScheme) -> ConfigurationStore {
  match JsonFileSettings::new() {
    Ok(settings) => ConfigurationStore::new(Arc::new(settings), Arc::new(SystemSecretStore::new())),
    Err(e) => {
      eprintln!("{} {}", colors.error("Error:"), e);
      process::exit(1);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_url_adds_https_scheme() {
    assert_eq!(
      normalize_url("reviews.example.com").unwrap(),
      "https://reviews.example.com"
    );
  }

  #[test]
  fn test_normalize_url_keeps_existing_scheme() {
    assert_eq!(
      normalize_url("http://reviews.example.com").unwrap(),
      "http://reviews.example.com"
    );
  }

  #[test]
  fn test_normalize_url_strips_trailing_slash() {
    assert_eq!(
      normalize_url("https://reviews.example.com/").unwrap(),
      "https://reviews.example.com"
    );
  }

  #[test]
  fn test_configure_without_flags_is_rejected() {
    let cli = Cli::try_parse_from(["rbconnect", "configure"]).unwrap();
    assert!(cli.validate().is_err());
  }

  #[test]
  fn test_configure_with_a_flag_is_accepted() {
    let cli = Cli::try_parse_from(["rbconnect", "configure", "--url", "https://reviews.example.com"]).unwrap();
    assert!(cli.validate().is_ok());
  }

  #[test]
  fn test_use_token_flag_without_value_means_true() {
    let cli = Cli::try_parse_from(["rbconnect", "configure", "--use-token"]).unwrap();
    match cli.command {
      Command::Configure { connection } => assert_eq!(connection.use_token, Some(true)),
      _ => panic!("expected configure"),
    }
  }

  #[test]
  fn test_zero_timeout_is_rejected() {
    let cli = Cli::try_parse_from(["rbconnect", "auth", "test", "--timeout", "0"]).unwrap();
    assert!(cli.validate().is_err());
  }
}
