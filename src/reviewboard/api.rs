//! Trait definitions for talking to Review Board.

use anyhow::Result;
use async_trait::async_trait;

use super::models::ServerInfo;

/// Trait for the Review Board API operations the connection test needs
/// (enables testing with fake implementations).
#[async_trait]
pub trait RbApi: Send + Sync {
  /// Verify the configured credential against the server.
  ///
  /// # Returns
  /// The server's product information when authentication succeeds.
  async fn test_connection(&self) -> Result<ServerInfo>;
}
