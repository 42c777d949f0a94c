//! Outer invocation wrapper.
//!
//! [`run`] drives one full synchronization: fetch the raw snapshot, ingest
//! CSV, normalize column types, resolve missing values, extract listings, and
//! reconcile them against the target table. The outcome is reduced to a
//! status code and a short message for the caller; observers receive the
//! structured result.

use std::fmt;
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::connectors::object_store::ObjectStoreReader;
use crate::error::SyncResult;
use crate::ingestion::ingest_csv_from_reader;
use crate::listing::Listing;
use crate::processing::{normalize, resolve_nulls};
use crate::sync::engine::{Reconciler, SyncReport};
use crate::sync::observability::{severity_for_error, SyncContext, SyncObserver, SyncSeverity};
use crate::sync::table::ListingTable;

/// Status code and message returned to the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// 200 on success, 500 on failure.
    pub status_code: u16,
    /// Short human-readable summary.
    pub body: String,
}

/// Options controlling run behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct RunOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn SyncObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: SyncSeverity,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: SyncSeverity::Critical,
        }
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Fetch, clean, and reconcile one snapshot.
///
/// This is the fallible core of [`run`]; it leaves outcome mapping and
/// observer dispatch to the caller.
pub async fn sync_snapshot(
    store: &dyn ObjectStoreReader,
    table: &mut dyn ListingTable,
    config: &SyncConfig,
    observer: Option<Arc<dyn SyncObserver>>,
) -> SyncResult<SyncReport> {
    let stream = store.fetch_object(&config.bucket, &config.object_key)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(stream);
    let raw = ingest_csv_from_reader(&mut rdr)?;

    let dataset = resolve_nulls(normalize(raw));
    let listings = Listing::from_dataset(&dataset)?;

    let mut engine = Reconciler::new(config);
    if let Some(obs) = observer {
        engine = engine.with_observer(obs);
    }
    engine.reconcile(&listings, table).await
}

/// Run one synchronization and reduce the result to a [`SyncOutcome`].
///
/// When an observer is configured, this function reports:
///
/// - `on_batch` as the engine hands batches to the table
/// - `on_success` on success, with the run's write counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >=
///   `options.alert_at_or_above`
///
/// The table handle is closed on both paths; on the failure path the close is
/// best-effort.
pub async fn run(
    store: &dyn ObjectStoreReader,
    table: &mut dyn ListingTable,
    config: &SyncConfig,
    options: &RunOptions,
) -> SyncOutcome {
    let ctx = SyncContext {
        table_name: config.table_name.clone(),
        object: format!("{}/{}", config.bucket, config.object_key),
    };

    let result = sync_snapshot(store, table, config, options.observer.clone()).await;
    let result = match result {
        Ok(report) => table.close().await.map(|()| report),
        Err(e) => {
            let _ = table.close().await;
            Err(e)
        }
    };

    match result {
        Ok(report) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(&ctx, &report);
            }
            SyncOutcome {
                status_code: 200,
                body: format!(
                    "sync complete: {} inserted, {} updated, {} unchanged across {} batches",
                    report.inserted, report.updated, report.unchanged, report.batches
                ),
            }
        }
        Err(e) => {
            if let Some(obs) = options.observer.as_ref() {
                let severity = severity_for_error(&e);
                obs.on_failure(&ctx, severity, &e);
                if severity >= options.alert_at_or_above {
                    obs.on_alert(&ctx, severity, &e);
                }
            }
            SyncOutcome {
                status_code: 500,
                body: format!("sync failed: {e}"),
            }
        }
    }
}
