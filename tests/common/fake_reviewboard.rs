//! Fake Review Board API client for testing
//!
//! Provides a stub implementation of the Review Board API that records the
//! authorization header it was given and answers without making any network
//! requests.

use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rbconnect::credentials::Credential;
use rbconnect::reviewboard::{Product, RbApi, ServerInfo};

/// A fake Review Board server that accepts exactly one credential.
pub struct FakeReviewBoard {
  accepted_header: String,
  presented_header: Mutex<Option<String>>,
}

impl FakeReviewBoard {
  /// Create a fake server that accepts `credential` and rejects all others.
  pub fn accepting(credential: &Credential) -> Self {
    Self {
      accepted_header: credential.authorization_header(),
      presented_header: Mutex::new(None),
    }
  }

  /// Connect with `credential`, as the real client would: render the
  /// authorization header and present it to the server.
  pub async fn connect(&self, credential: &Credential) -> Result<ServerInfo> {
    *self.presented_header.lock().unwrap() = Some(credential.authorization_header());
    self.test_connection().await
  }

  /// The header the last connection attempt presented, if any.
  pub fn last_presented_header(&self) -> Option<String> {
    self.presented_header.lock().unwrap().clone()
  }
}

#[async_trait]
impl RbApi for FakeReviewBoard {
  async fn test_connection(&self) -> Result<ServerInfo> {
    let presented = self.presented_header.lock().unwrap().clone();
    match presented {
      Some(header) if header == self.accepted_header => Ok(ServerInfo {
        product: Product {
          name: "Review Board".to_string(),
          version: "2.5.6".to_string(),
        },
      }),
      _ => Err(anyhow!("401 Unauthorized")),
    }
  }
}
