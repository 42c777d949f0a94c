//! Reconciliation of a cleaned snapshot against the target table.
//!
//! The engine walks records in fixed-size batches and decides, per record,
//! whether to insert, update the tracked mutable fields, or skip. All writes
//! go through the [`ListingTable`] seam; the sqlx-backed implementation lives
//! in [`postgres`] (feature `postgres`).

pub mod engine;
pub mod observability;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod table;

pub use engine::{Reconciler, SyncReport};
pub use observability::{
    CompositeObserver, FileObserver, StdErrObserver, SyncContext, SyncObserver, SyncSeverity,
};
#[cfg(feature = "postgres")]
pub use postgres::PgListingTable;
pub use table::{default_listing_ddl, ListingTable, TrackedFields};
