//! Tests for the connection-test flow against a fake Review Board server.

mod common;

use std::sync::Arc;

use common::fake_reviewboard::FakeReviewBoard;
use rbconnect::config::{Configuration, ConfigurationStore, MemorySettings};
use rbconnect::credentials::Credential;
use rbconnect::secrets::MemorySecretStore;

fn saved_store(config: &Configuration) -> ConfigurationStore {
  let mut store = ConfigurationStore::new(Arc::new(MemorySettings::new()), Arc::new(MemorySecretStore::new()));
  store.save(config).unwrap();
  store
}

#[tokio::test]
async fn test_saved_password_settings_authenticate() {
  let config = Configuration {
    url: Some("https://reviews.example.com".to_string()),
    username: Some("alice".to_string()),
    password: Some("hunter2".to_string()),
    ..Configuration::default()
  };
  let server = FakeReviewBoard::accepting(&Credential::UsernamePassword {
    username: "alice".to_string(),
    password: "hunter2".to_string(),
  });

  // The flow the `auth test` command follows: load, gate, build, connect.
  let mut store = saved_store(&config);
  let snapshot = store.load();
  assert!(snapshot.is_valid());

  let credential = snapshot.create_credentials().unwrap();
  let info = server.connect(&credential).await.unwrap();

  assert_eq!(info.product.name, "Review Board");
  assert_eq!(
    server.last_presented_header().unwrap(),
    credential.authorization_header()
  );
}

#[tokio::test]
async fn test_saved_token_settings_authenticate() {
  let config = Configuration {
    url: Some("https://reviews.example.com".to_string()),
    token: Some("rbtoken".to_string()),
    use_token: Some(true),
    ..Configuration::default()
  };
  let server = FakeReviewBoard::accepting(&Credential::ApiToken {
    token: "rbtoken".to_string(),
  });

  let mut store = saved_store(&config);
  let credential = store.load().create_credentials().unwrap();

  assert!(server.connect(&credential).await.is_ok());
  assert_eq!(server.last_presented_header().unwrap(), "token rbtoken");
}

#[tokio::test]
async fn test_wrong_credential_is_rejected() {
  let server = FakeReviewBoard::accepting(&Credential::ApiToken {
    token: "rbtoken".to_string(),
  });

  let wrong = Credential::ApiToken {
    token: "expired".to_string(),
  };
  assert!(server.connect(&wrong).await.is_err());
}

#[test]
fn test_invalid_settings_never_reach_the_server() {
  let config = Configuration {
    url: Some("https://reviews.example.com".to_string()),
    username: Some("alice".to_string()),
    // No password saved.
    ..Configuration::default()
  };

  let mut store = saved_store(&config);
  let snapshot = store.load();

  assert!(!snapshot.is_valid());
  assert!(snapshot.create_credentials().is_err());
}
