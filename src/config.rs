//! Run configuration.
//!
//! The reconciliation engine takes its table name, batch size, and bootstrap
//! DDL from [`SyncConfig`] at construction time; nothing in the pipeline reads
//! module-level constants. [`SyncConfig::load`] merges built-in defaults, an
//! optional `sync.toml`, and `SYNC_`-prefixed environment variables
//! (`SYNC_TABLE_NAME`, `SYNC_DATABASE__HOST`, ...).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;

/// Default number of records per reconciliation batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Connection settings for the target database (secrets come from a
/// [`crate::connectors::credentials::CredentialProvider`], not from here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
        }
    }
}

/// Configuration for one synchronization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Object-store bucket holding the raw snapshot.
    pub bucket: String,
    /// Object key of the snapshot CSV within the bucket.
    pub object_key: String,
    /// Name of the target table.
    pub table_name: String,
    /// Records per reconciliation batch; must be greater than zero.
    pub batch_size: usize,
    /// Bootstrap DDL for the target table. When `None`, the engine uses
    /// [`crate::sync::default_listing_ddl`] for [`SyncConfig::table_name`].
    pub schema_ddl: Option<String>,
    /// Target database connection settings.
    pub database: DatabaseConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bucket: "listings-raw".to_string(),
            object_key: "listings.csv".to_string(),
            table_name: "listings".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            schema_ddl: None,
            database: DatabaseConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from defaults, `sync.toml`, and the environment.
    ///
    /// Later sources win: environment variables override the TOML file, which
    /// overrides the built-in defaults. Nested keys use `__` in the
    /// environment (`SYNC_DATABASE__HOST`).
    pub fn load() -> SyncResult<Self> {
        Ok(Figment::from(Serialized::defaults(SyncConfig::default()))
            .merge(Toml::file("sync.toml"))
            .merge(Env::prefixed("SYNC_").split("__"))
            .extract()?)
    }
}
