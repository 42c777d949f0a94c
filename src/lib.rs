//! `listing-sync` synchronizes a tabular snapshot of listing records into a
//! persistent relational table.
//!
//! A run moves one CSV snapshot through four stages:
//!
//! 1. **Ingestion** ([`ingestion`]): the raw object becomes an untyped
//!    [`types::RawDataset`].
//! 2. **Type normalization** ([`processing::normalize`]): each column commits
//!    to exactly one [`types::DataType`] — integer, float, date, or text, in
//!    that priority order — and every cell is coerced accordingly.
//! 3. **Null policy** ([`processing::resolve_nulls`]): missing values become
//!    `"UNKNOWN"`, `0`, or the column's mode date, by committed type.
//! 4. **Reconciliation** ([`sync`]): records are walked in fixed-size batches
//!    and, per `id`, inserted, updated (when a tracked mutable field changed,
//!    advancing `last_updated_date`), or skipped. One commit covers the run.
//!
//! External collaborators — credentials, the object store, the table handle —
//! are injected traits ([`connectors`], [`sync::ListingTable`]), so the whole
//! pipeline runs against in-memory fakes in tests.
//!
//! ## Example: one full run against PostgreSQL
//!
//! ```no_run
//! use listing_sync::config::SyncConfig;
//! use listing_sync::connectors::{EnvCredentialProvider, FsObjectStore};
//! use listing_sync::runner::{run, RunOptions};
//! use listing_sync::sync::PgListingTable;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), listing_sync::SyncError> {
//!     let config = SyncConfig::load()?;
//!     let store = FsObjectStore::new("/var/snapshots");
//!     let mut table = PgListingTable::connect(&config, &EnvCredentialProvider).await?;
//!
//!     let outcome = run(&store, &mut table, &config, &RunOptions::default()).await;
//!     println!("{} {}", outcome.status_code, outcome.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: raw CSV ingestion
//! - [`processing`]: type normalization and missing-value policy
//! - [`sync`]: the reconciliation engine, table seam, and observers
//! - [`connectors`]: credential and object-store seams
//! - [`config`]: run configuration (figment: defaults + TOML + env)
//! - [`runner`]: the outer fetch→clean→reconcile invocation
//! - [`types`]: schema + in-memory dataset types
//! - [`listing`]: the fixed 16-field record contract
//! - [`error`]: error types used across the pipeline

pub mod config;
pub mod connectors;
pub mod error;
pub mod ingestion;
pub mod listing;
pub mod processing;
pub mod runner;
pub mod sync;
pub mod types;

pub use error::{SyncError, SyncResult};
