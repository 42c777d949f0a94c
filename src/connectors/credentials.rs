//! Credential retrieval seam.
//!
//! Secret payloads are JSON documents of the shape secret managers hand out
//! (`{"accessKeyId": ..., "secretAccessKey": ..., "region": ...}` for the
//! object store, `{"username": ..., "password": ...}` for the database); both
//! deserialize into [`Credentials`].

use std::fmt;

use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Which collaborator a credential set is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Credentials for the object store holding raw snapshots.
    ObjectStore,
    /// Credentials for the target database.
    Database,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::ObjectStore => write!(f, "object-store"),
            CredentialKind::Database => write!(f, "database"),
        }
    }
}

/// A key/secret pair with an optional region.
///
/// For database credentials, `key` is the username and `secret` the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key or username.
    #[serde(alias = "accessKeyId", alias = "username")]
    pub key: String,
    /// Secret key or password.
    #[serde(alias = "secretAccessKey", alias = "password")]
    pub secret: String,
    /// Provider region, when the backend has one.
    #[serde(default)]
    pub region: Option<String>,
}

impl Credentials {
    /// Parse a secret-manager JSON payload.
    pub fn from_json(kind: CredentialKind, payload: &str) -> SyncResult<Self> {
        serde_json::from_str(payload).map_err(|e| SyncError::Credential {
            kind,
            message: e.to_string(),
        })
    }
}

/// Source of credentials for the run's external collaborators.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the credentials for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Credential`] if the secret cannot be retrieved or
    /// parsed; the run aborts before any data access.
    fn get_credentials(&self, kind: CredentialKind) -> SyncResult<Credentials>;
}

/// Reads credentials from the process environment.
///
/// Object-store credentials come from `SYNC_OBJECT_STORE_KEY` /
/// `SYNC_OBJECT_STORE_SECRET` / `SYNC_OBJECT_STORE_REGION`, database
/// credentials from `SYNC_DATABASE_KEY` / `SYNC_DATABASE_SECRET`.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn get_credentials(&self, kind: CredentialKind) -> SyncResult<Credentials> {
        let prefix = match kind {
            CredentialKind::ObjectStore => "SYNC_OBJECT_STORE_",
            CredentialKind::Database => "SYNC_DATABASE_",
        };
        Figment::from(Env::prefixed(prefix))
            .extract()
            .map_err(|e| SyncError::Credential {
                kind,
                message: e.to_string(),
            })
    }
}

/// Fixed credentials handed in at construction; for tests and local runs.
#[derive(Debug, Default)]
pub struct StaticCredentialProvider {
    /// Object-store credentials, if configured.
    pub object_store: Option<Credentials>,
    /// Database credentials, if configured.
    pub database: Option<Credentials>,
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_credentials(&self, kind: CredentialKind) -> SyncResult<Credentials> {
        let creds = match kind {
            CredentialKind::ObjectStore => self.object_store.as_ref(),
            CredentialKind::Database => self.database.as_ref(),
        };
        creds.cloned().ok_or_else(|| SyncError::Credential {
            kind,
            message: "no credentials configured".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_store_payload_aliases() {
        let payload = r#"{"accessKeyId": "AKIA", "secretAccessKey": "shh", "region": "us-east-1"}"#;
        let creds = Credentials::from_json(CredentialKind::ObjectStore, payload).unwrap();
        assert_eq!(creds.key, "AKIA");
        assert_eq!(creds.secret, "shh");
        assert_eq!(creds.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn parses_database_payload_aliases() {
        let payload = r#"{"username": "loader", "password": "hunter2"}"#;
        let creds = Credentials::from_json(CredentialKind::Database, payload).unwrap();
        assert_eq!(creds.key, "loader");
        assert_eq!(creds.secret, "hunter2");
        assert_eq!(creds.region, None);
    }

    #[test]
    fn malformed_payload_is_a_credential_error() {
        let err = Credentials::from_json(CredentialKind::Database, "not json").unwrap_err();
        assert!(err.to_string().contains("credential error (database)"));
    }

    #[test]
    fn static_provider_errors_on_missing_kind() {
        let provider = StaticCredentialProvider {
            database: Some(Credentials {
                key: "loader".into(),
                secret: "hunter2".into(),
                region: None,
            }),
            ..Default::default()
        };
        assert!(provider.get_credentials(CredentialKind::Database).is_ok());
        let err = provider
            .get_credentials(CredentialKind::ObjectStore)
            .unwrap_err();
        assert!(err.to_string().contains("object-store"));
    }
}
