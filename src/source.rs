//! # Image Acquisition
//!
//! Abstract seam for raw image intake. A source is an exclusively-owned
//! resource: the session holds at most one at a time, acquires it before
//! reading, and releases it on every exit path. `release` is idempotent so
//! teardown can always call it unconditionally.
//!
//! The concrete source here is the upload path (a file on disk). A live
//! camera stream maps onto the same lifecycle: acquire the device, pull a
//! frame, release all underlying tracks.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{PalError, PalResult};
use crate::normalize::guard_byte_ceiling;

/// Abstract interface for raw image sources.
#[async_trait]
pub trait ImageSource: Send {
    /// Take exclusive ownership of the underlying resource.
    async fn acquire(&mut self) -> PalResult<()>;

    /// Produce one raw image from the acquired source.
    async fn next_image(&mut self) -> PalResult<Vec<u8>>;

    /// Release the underlying resource. Idempotent; runs on every exit path.
    async fn release(&mut self) -> PalResult<()>;

    /// Human-readable origin, for console feedback.
    fn describe(&self) -> String;
}

/// Upload-path source reading a single image file.
pub struct FileSource {
    path: PathBuf,
    max_bytes: u64,
    acquired: bool,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            acquired: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for FileSource {
    async fn acquire(&mut self) -> PalResult<()> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| PalError::acquire(format!("{}: {}", self.path.display(), e)))?;
        if !meta.is_file() {
            return Err(PalError::acquire(format!(
                "{} is not a regular file",
                self.path.display()
            )));
        }
        self.acquired = true;
        Ok(())
    }

    async fn next_image(&mut self) -> PalResult<Vec<u8>> {
        if !self.acquired {
            return Err(PalError::acquire("source has not been acquired"));
        }
        // Fast precondition: reject oversized inputs from metadata alone,
        // before any bytes are read into memory.
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| PalError::acquire(format!("{}: {}", self.path.display(), e)))?;
        guard_byte_ceiling(meta.len(), self.max_bytes)?;

        tokio::fs::read(&self.path)
            .await
            .map_err(|e| PalError::acquire(format!("{}: {}", self.path.display(), e)))
    }

    async fn release(&mut self) -> PalResult<()> {
        self.acquired = false;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
