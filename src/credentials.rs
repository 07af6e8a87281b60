//! Authentication credentials for Review Board.
//!
//! A [`Credential`] is derived on demand from a valid
//! [`Configuration`](crate::config::Configuration) and rendered into the two
//! shapes Review Board accepts: an HTTP `Authorization` header for the REST
//! API and an argument list for the `rbt` command-line tool.
//!
//! Credentials are never stored; the secret material they carry lives in the
//! system keyring (see [`crate::secrets`]) and is re-read each time a
//! credential is built.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// An immutable authentication credential.
///
/// The variants map to the two authentication schemes Review Board supports.
/// Adding a new scheme means adding a variant here and an arm to each of the
/// two render methods below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
  /// HTTP Basic authentication with a username and password.
  UsernamePassword {
    /// Review Board account name.
    username: String,
    /// Account password.
    password: String,
  },
  /// API token authentication.
  ApiToken {
    /// Token generated under "My Account > API Tokens" on the server.
    token: String,
  },
}

impl Credential {
  /// Render the credential as an HTTP `Authorization` header value.
  ///
  /// # Returns
  /// `"Basic " + base64(username + ":" + password)` for username/password
  /// credentials, or `"token " + token` for API tokens. The format is
  /// byte-exact; the Review Board REST API consumes it verbatim.
  pub fn authorization_header(&self) -> String {
    match self {
      Self::UsernamePassword { username, password } => {
        format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
      }
      Self::ApiToken { token } => format!("token {token}"),
    }
  }

  /// Render the credential as arguments for the `rbt` command-line tool.
  ///
  /// # Returns
  /// `["--username", <name>, "--password", <password>]` or
  /// `["--api-token", <token>]`, matching the flags RBTools expects.
  pub fn command_line_arguments(&self) -> Vec<String> {
    match self {
      Self::UsernamePassword { username, password } => vec![
        "--username".to_string(),
        username.clone(),
        "--password".to_string(),
        password.clone(),
      ],
      Self::ApiToken { token } => vec!["--api-token".to_string(), token.clone()],
    }
  }
}
