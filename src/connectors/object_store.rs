//! Object store seam for raw snapshot retrieval.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::error::{SyncError, SyncResult};

/// Source of raw snapshot objects, addressed by bucket and key.
pub trait ObjectStoreReader: Send + Sync {
    /// Open the object as a byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ObjectNotFound`] when no object exists at
    /// `bucket`/`key`, [`SyncError::Io`] for other read faults.
    fn fetch_object(&self, bucket: &str, key: &str) -> SyncResult<Box<dyn Read + Send>>;
}

/// Filesystem-backed object store.
///
/// Objects live at `<root>/<bucket>/<key>`; this covers local snapshot drops
/// and tests. Remote stores plug in behind [`ObjectStoreReader`].
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ObjectStoreReader for FsObjectStore {
    fn fetch_object(&self, bucket: &str, key: &str) -> SyncResult<Box<dyn Read + Send>> {
        let path = self.root.join(bucket).join(key);
        match File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SyncError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(SyncError::Io(e)),
        }
    }
}
