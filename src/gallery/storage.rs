//! Key-value storage backends for the gallery: one origin-scoped slot whose
//! value is the JSON-serialized collection. `get` and `set` are whole-value
//! operations; each `set` is a full overwrite.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{PalError, PalResult};

/// Durable key-value slot holding the serialized gallery collection.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the stored value, `None` when nothing was ever written.
    async fn get(&self) -> PalResult<Option<String>>;

    /// Overwrite the stored value in full.
    async fn set(&self, value: &str) -> PalResult<()>;

    /// Human-readable location, for startup log lines.
    fn describe(&self) -> String;
}

/// File-backed slot: a single JSON file on disk.
pub struct FsStorage {
    path: PathBuf,
}

impl FsStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for FsStorage {
    async fn get(&self) -> PalResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PalError::storage("read", e).with_path(self.path.display().to_string())),
        }
    }

    async fn set(&self, value: &str) -> PalResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    PalError::storage("create_dir", e).with_path(parent.display().to_string())
                })?;
            }
        }
        tokio::fs::write(&self.path, value)
            .await
            .map_err(|e| PalError::storage("write", e).with_path(self.path.display().to_string()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory slot shared across clones; the injected test double.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the slot, e.g. with a corrupted value for resilience tests.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Snapshot of the current raw value.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().expect("storage slot poisoned").clone()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self) -> PalResult<Option<String>> {
        Ok(self.slot.lock().expect("storage slot poisoned").clone())
    }

    async fn set(&self, value: &str) -> PalResult<()> {
        *self.slot.lock().expect("storage slot poisoned") = Some(value.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
