//! Data transfer objects returned by the Review Board REST API.

use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /api/info/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
  /// `"ok"` on success; the API reports failures in-band here.
  pub stat: String,
  /// Server details.
  pub info: ServerInfo,
}

/// Server details from the info resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
  /// Product block identifying the server software.
  pub product: Product,
}

/// Product block identifying the Review Board installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  /// Product name (typically `"Review Board"`).
  pub name: String,
  /// Human-readable version string.
  pub version: String,
}
