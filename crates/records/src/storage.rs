//! Durable storage backends for the records store
//!
//! The store keeps its authoritative copy in memory and hands the complete
//! map to a [`Storage`] after every change. Backends only move bytes: they
//! never merge, and they report failures instead of swallowing them.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::record::{PlayerId, PlayerRecord};

/// All records, keyed by player id (string keys on disk)
pub type RecordMap = BTreeMap<PlayerId, PlayerRecord>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("malformed records in {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
    #[error("failed to encode records: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the store keeps its durable copy
pub trait Storage: Send + Sync {
    /// Read the stored map; `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<RecordMap>, StoreError>;

    /// Replace the stored map with `records`
    fn save(&self, records: &RecordMap) -> Result<(), StoreError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

fn encode(records: &RecordMap) -> Result<String, StoreError> {
    serde_json::to_string_pretty(records).map_err(StoreError::Encode)
}

fn decode(text: &str, origin: impl Into<String>) -> Result<RecordMap, StoreError> {
    serde_json::from_str(text).map_err(|source| StoreError::Parse {
        origin: origin.into(),
        source,
    })
}

fn write_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Write { path, source }
}

/// Pretty-printed JSON document on the local filesystem
///
/// Saves go to a sibling `.tmp` file first and are renamed over the target,
/// so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<RecordMap>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        decode(&text, self.path.display().to_string()).map(Some)
    }

    fn save(&self, records: &RecordMap) -> Result<(), StoreError> {
        let text = encode(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err(parent))?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, text).map_err(write_err(&tmp))?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    document: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

/// In-process storage holding the same JSON document a file would
///
/// Clones share one document, so a test can keep a handle after giving the
/// storage to a store. Reads and writes can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<MemoryInner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with a raw document
    pub fn with_document(document: impl Into<String>) -> Self {
        let storage = Self::new();
        *storage.lock() = Some(document.into());
        storage
    }

    /// The last document saved, if any
    pub fn document(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.inner
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<RecordMap>, StoreError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        match self.lock().as_deref() {
            Some(text) => decode(text, "memory").map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, records: &RecordMap) -> Result<(), StoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let text = encode(records)?;
        *self.lock() = Some(text);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
