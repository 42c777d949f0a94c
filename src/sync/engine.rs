//! The reconciliation engine.

use std::sync::Arc;

use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::listing::Listing;

use super::observability::{SyncContext, SyncObserver};
use super::table::{default_listing_ddl, ListingTable};

/// Write counts for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of batches handed to the table.
    pub batches: usize,
    /// Rows inserted (id absent from the table).
    pub inserted: usize,
    /// Rows whose tracked fields were rewritten.
    pub updated: usize,
    /// Rows skipped because all tracked fields matched.
    pub unchanged: usize,
}

/// Walks a cleaned snapshot in fixed-size batches and reconciles each record
/// against the target table.
///
/// Table name, batch size, and bootstrap DDL come from [`SyncConfig`] at
/// construction time.
pub struct Reconciler {
    table_name: String,
    batch_size: usize,
    ddl: String,
    ctx: SyncContext,
    observer: Option<Arc<dyn SyncObserver>>,
}

impl Reconciler {
    /// Create an engine for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.batch_size == 0`.
    pub fn new(config: &SyncConfig) -> Self {
        assert!(config.batch_size > 0, "batch_size must be > 0");

        let ddl = config
            .schema_ddl
            .clone()
            .unwrap_or_else(|| default_listing_ddl(&config.table_name));
        Self {
            table_name: config.table_name.clone(),
            batch_size: config.batch_size,
            ddl,
            ctx: SyncContext {
                table_name: config.table_name.clone(),
                object: format!("{}/{}", config.bucket, config.object_key),
            },
            observer: None,
        }
    }

    /// Attach an observer for batch progress events.
    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Reconcile `listings` against the table.
    ///
    /// Ensures the table exists, then processes contiguous batches in dataset
    /// order. Per record: absent `id` → insert with all fields; present with
    /// any tracked field differing → update exactly the tracked fields;
    /// otherwise no write. One commit covers the whole run; any error aborts
    /// with no commit issued here.
    pub async fn reconcile(
        &self,
        listings: &[Listing],
        table: &mut dyn ListingTable,
    ) -> SyncResult<SyncReport> {
        table.ensure_table(&self.table_name, &self.ddl).await?;

        let mut report = SyncReport::default();
        for (batch_index, batch) in listings.chunks(self.batch_size).enumerate() {
            if let Some(obs) = self.observer.as_ref() {
                obs.on_batch(&self.ctx, batch_index, batch.len());
            }

            for listing in batch {
                match table.lookup(listing.id).await? {
                    None => {
                        table.insert(listing).await?;
                        report.inserted += 1;
                    }
                    Some(stored) => {
                        if stored != listing.tracked() {
                            table.update(listing.id, &listing.tracked()).await?;
                            report.updated += 1;
                        } else {
                            report.unchanged += 1;
                        }
                    }
                }
            }
            report.batches += 1;
        }

        table.commit().await?;
        Ok(report)
    }
}
