//! The gallery store: a small persistence façade over the ordered scan
//! collection. All structural changes go through `append`/`delete`; `list`
//! hands out a read-only snapshot of the in-memory state.

use uuid::Uuid;

use crate::analysis::RockAnalysis;
use crate::error::{PalError, PalResult};
use crate::normalize::EncodedImage;

use super::{SavedScan, StorageBackend, now_ms};

/// Owns the full collection; no other component mutates it directly.
pub struct GalleryStore {
    backend: Box<dyn StorageBackend>,
    scans: Vec<SavedScan>,
}

impl GalleryStore {
    /// Load the persisted collection once, at startup.
    ///
    /// An absent value yields an empty collection. A present but unparsable
    /// value is logged and also yields an empty collection, so the user sees
    /// an empty gallery rather than a crash.
    pub async fn load(backend: Box<dyn StorageBackend>) -> Self {
        let scans = match backend.get().await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<SavedScan>>(&raw) {
                Ok(scans) => scans,
                Err(e) => {
                    eprintln!(
                        "warning: could not parse saved scans at {}, starting with an empty collection: {}",
                        backend.describe(),
                        e
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                eprintln!(
                    "warning: could not read saved scans at {}, starting with an empty collection: {}",
                    backend.describe(),
                    e
                );
                Vec::new()
            }
        };
        Self { backend, scans }
    }

    /// Save a (payload, analysis) pair: fresh identifier, current timestamp,
    /// prepended so the collection stays newest-first, then written through.
    ///
    /// A failed write-through rolls the in-memory collection back, so memory
    /// and the stored snapshot never diverge.
    pub async fn append(
        &mut self,
        image: &EncodedImage,
        analysis: RockAnalysis,
    ) -> PalResult<&SavedScan> {
        let scan = SavedScan {
            id: Uuid::new_v4().to_string(),
            timestamp: now_ms(),
            image_url: image.to_data_url(),
            analysis,
        };
        self.scans.insert(0, scan);
        if let Err(e) = self.persist().await {
            self.scans.remove(0);
            return Err(e);
        }
        Ok(&self.scans[0])
    }

    /// Remove the scan with the given identifier, if present. Deleting an
    /// absent identifier is a no-op, not an error. A failed write-through
    /// restores the removed scan.
    pub async fn delete(&mut self, id: &str) -> PalResult<bool> {
        let Some(pos) = self.scans.iter().position(|scan| scan.id == id) else {
            return Ok(false);
        };
        let removed = self.scans.remove(pos);
        if let Err(e) = self.persist().await {
            self.scans.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// The current in-memory collection, newest first. No reload; treat the
    /// slice as a read-only snapshot.
    pub fn list(&self) -> &[SavedScan] {
        &self.scans
    }

    /// Look up one scan by identifier.
    pub fn find(&self, id: &str) -> Option<&SavedScan> {
        self.scans.iter().find(|scan| scan.id == id)
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Re-serialize the full collection and overwrite the stored value.
    async fn persist(&self) -> PalResult<()> {
        let raw = serde_json::to_string(&self.scans).map_err(|e| {
            PalError::storage(
                "serialize",
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        self.backend.set(&raw).await
    }
}
