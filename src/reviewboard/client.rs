//! HTTP client implementation for talking to the Review Board REST API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;

use super::api::RbApi;
use super::models::{InfoResponse, ServerInfo};
use crate::credentials::Credential;

/// Review Board API client.
///
/// Holds an immutable credential snapshot taken when the client is built, so
/// an in-flight request never observes settings edited after it started.
pub struct RbClient {
  base_url: String,
  credential: Credential,
  client: reqwest::Client,
}

impl RbClient {
  /// Create a new Review Board client.
  ///
  /// # Arguments
  /// * `base_url` - The server base URL (e.g., https://reviews.example.com)
  /// * `credential` - Credential snapshot used for every request.
  /// * `timeout_secs` - Request timeout in seconds.
  ///
  /// # Errors
  /// Returns an error when the underlying HTTP client cannot be constructed.
  pub fn new(base_url: &str, credential: Credential, timeout_secs: u64) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .context("failed to create HTTP client")?;

    Ok(Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      credential,
      client,
    })
  }
}

#[async_trait]
impl RbApi for RbClient {
  async fn test_connection(&self) -> Result<ServerInfo> {
    let url = format!("{}/api/info/", self.base_url);
    tracing::debug!(%url, "testing connection");

    let response = self
      .client
      .get(&url)
      .header(reqwest::header::AUTHORIZATION, self.credential.authorization_header())
      .header(reqwest::header::ACCEPT, "application/json")
      .send()
      .await
      .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
      return Err(anyhow!(
        "the server rejected the credentials ({status}); check your username/password or API token"
      ));
    }
    if !status.is_success() {
      return Err(anyhow!("server returned {status} for {url}"));
    }

    let body: InfoResponse = response
      .json()
      .await
      .context("failed to decode the server info response")?;
    if body.stat != "ok" {
      return Err(anyhow!("server reported stat={}", body.stat));
    }

    Ok(body.info)
  }
}
