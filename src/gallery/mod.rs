//! # Gallery Persistence
//!
//! A durable, ordered collection of saved scans: each record pairs a
//! canonical image payload (in data-URL form) with the analysis returned for
//! it. The collection is loaded once at startup, held in memory, and mirrored
//! back to the backend as a full snapshot on every mutation. The persisted
//! value is always either the pre- or post-mutation collection, never a
//! partial one.
//!
//! The storage mechanism is injected through [`StorageBackend`], so tests run
//! against an in-memory slot while the application uses a JSON file.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::analysis::RockAnalysis;

mod storage;
mod store;

pub use storage::{FsStorage, MemoryStorage, StorageBackend};
pub use store::GalleryStore;

/// Default file name of the persisted collection.
pub const DEFAULT_GALLERY_FILE: &str = "prospector_scans.json";

/// The unit of gallery persistence. Created when the user saves a displayed
/// result; never mutated afterward; destroyed only by explicit deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScan {
    /// Collision-free identifier generated at save time
    pub id: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Canonical payload as a `data:` URL
    pub image_url: String,
    /// The analysis returned for this payload
    pub analysis: RockAnalysis,
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
