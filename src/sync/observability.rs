use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SyncError;

use super::engine::SyncReport;

/// Severity classification used for observer callbacks and alerting
/// thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SyncSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (run failed).
    Error,
    /// Critical error (I/O, storage, or other infrastructure failures).
    Critical,
}

/// Context about a synchronization run.
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Target table name.
    pub table_name: String,
    /// Source object, as `bucket/key`.
    pub object: String,
}

/// Observer interface for synchronization outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait SyncObserver: Send + Sync {
    /// Called when a run completes, with its write counts.
    fn on_success(&self, _ctx: &SyncContext, _report: &SyncReport) {}

    /// Called when a run fails.
    fn on_failure(&self, _ctx: &SyncContext, _severity: SyncSeverity, _error: &SyncError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &SyncContext, severity: SyncSeverity, error: &SyncError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called as each batch is handed to the table.
    fn on_batch(&self, _ctx: &SyncContext, _batch_index: usize, _rows: usize) {}
}

/// Severity of a run failure.
///
/// Infrastructure faults (I/O, storage) are `Critical`; data-shape faults are
/// `Error`.
pub fn severity_for_error(e: &SyncError) -> SyncSeverity {
    match e {
        SyncError::Io(_) | SyncError::Storage(_) | SyncError::ObjectNotFound { .. } => {
            SyncSeverity::Critical
        }
        SyncError::Csv(err) => match err.kind() {
            csv::ErrorKind::Io(_) => SyncSeverity::Critical,
            _ => SyncSeverity::Error,
        },
        SyncError::Config(_)
        | SyncError::Credential { .. }
        | SyncError::SchemaMismatch { .. }
        | SyncError::TypeMismatch { .. } => SyncSeverity::Error,
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SyncObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn SyncObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SyncObserver for CompositeObserver {
    fn on_success(&self, ctx: &SyncContext, report: &SyncReport) {
        for o in &self.observers {
            o.on_success(ctx, report);
        }
    }

    fn on_failure(&self, ctx: &SyncContext, severity: SyncSeverity, error: &SyncError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &SyncContext, severity: SyncSeverity, error: &SyncError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_batch(&self, ctx: &SyncContext, batch_index: usize, rows: usize) {
        for o in &self.observers {
            o.on_batch(ctx, batch_index, rows);
        }
    }
}

/// Logs run events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl SyncObserver for StdErrObserver {
    fn on_success(&self, ctx: &SyncContext, report: &SyncReport) {
        eprintln!(
            "[sync][ok] table={} object={} batches={} inserted={} updated={} unchanged={}",
            ctx.table_name,
            ctx.object,
            report.batches,
            report.inserted,
            report.updated,
            report.unchanged
        );
    }

    fn on_failure(&self, ctx: &SyncContext, severity: SyncSeverity, error: &SyncError) {
        eprintln!(
            "[sync][{:?}] table={} object={} err={}",
            severity, ctx.table_name, ctx.object, error
        );
    }

    fn on_alert(&self, ctx: &SyncContext, severity: SyncSeverity, error: &SyncError) {
        eprintln!(
            "[ALERT][sync][{:?}] table={} object={} err={}",
            severity, ctx.table_name, ctx.object, error
        );
    }

    fn on_batch(&self, ctx: &SyncContext, batch_index: usize, rows: usize) {
        eprintln!(
            "[sync][batch] table={} batch={} rows={}",
            ctx.table_name, batch_index, rows
        );
    }
}

/// Appends run events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are
    /// ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl SyncObserver for FileObserver {
    fn on_success(&self, ctx: &SyncContext, report: &SyncReport) {
        self.append_line(&format!(
            "{} ok table={} object={} inserted={} updated={} unchanged={}",
            unix_ts(),
            ctx.table_name,
            ctx.object,
            report.inserted,
            report.updated,
            report.unchanged
        ));
    }

    fn on_failure(&self, ctx: &SyncContext, severity: SyncSeverity, error: &SyncError) {
        self.append_line(&format!(
            "{} fail severity={:?} table={} object={} err={}",
            unix_ts(),
            severity,
            ctx.table_name,
            ctx.object,
            error
        ));
    }

    fn on_alert(&self, ctx: &SyncContext, severity: SyncSeverity, error: &SyncError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} table={} object={} err={}",
            unix_ts(),
            severity,
            ctx.table_name,
            ctx.object,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
