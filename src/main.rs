//! rbconnect - Manage Review Board connection settings
//!
//! This is the main entry point for the CLI application.

use rbconnect::cli;

#[tokio::main]
async fn main() {
  cli::run().await;
}
