//! Gallery store contract tests: newest-first ordering, write-through
//! persistence, idempotent delete, resilience against corrupt stored values.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use prospector_pal::analysis::pyrite_fixture;
use prospector_pal::error::{PalError, PalResult};
use prospector_pal::gallery::{FsStorage, GalleryStore, MemoryStorage, StorageBackend};
use prospector_pal::normalize::EncodedImage;

/// Backend whose writes can be made to fail mid-test.
#[derive(Clone)]
struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyStorage {
    fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageBackend for FlakyStorage {
    async fn get(&self) -> PalResult<Option<String>> {
        self.inner.get().await
    }

    async fn set(&self, value: &str) -> PalResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PalError::storage("write", std::io::Error::other("disk full")));
        }
        self.inner.set(value).await
    }

    fn describe(&self) -> String {
        "flaky memory".to_string()
    }
}

fn payload() -> EncodedImage {
    EncodedImage {
        mime: "image/jpeg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
        width: 2,
        height: 2,
    }
}

#[tokio::test]
async fn append_then_list_round_trips_the_record() {
    let mut store = GalleryStore::load(Box::new(MemoryStorage::new())).await;
    assert!(store.is_empty());

    let created = store
        .append(&payload(), pyrite_fixture())
        .await
        .unwrap()
        .clone();

    let listed = store.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].analysis, pyrite_fixture());
    assert_eq!(listed[0].image_url, payload().to_data_url());
}

#[tokio::test]
async fn collection_stays_newest_first_with_monotonic_timestamps() {
    let mut store = GalleryStore::load(Box::new(MemoryStorage::new())).await;

    let first = store.append(&payload(), pyrite_fixture()).await.unwrap().clone();
    let second = store.append(&payload(), pyrite_fixture()).await.unwrap().clone();

    let listed = store.list();
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
    assert!(listed[0].timestamp >= listed[1].timestamp);
}

#[tokio::test]
async fn rapid_appends_never_collide_on_identifier() {
    let mut store = GalleryStore::load(Box::new(MemoryStorage::new())).await;

    for _ in 0..50 {
        store.append(&payload(), pyrite_fixture()).await.unwrap();
    }

    let ids: HashSet<String> = store.list().iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn delete_is_idempotent_for_absent_ids() {
    let mut store = GalleryStore::load(Box::new(MemoryStorage::new())).await;
    store.append(&payload(), pyrite_fixture()).await.unwrap();
    let before: Vec<_> = store.list().to_vec();

    let removed = store.delete("not-a-real-id").await.unwrap();
    assert!(!removed);
    assert_eq!(store.list(), &before[..]);
}

#[tokio::test]
async fn append_then_delete_returns_to_empty() {
    // End-to-end scenario: save one scan, list it, delete it, list again.
    let mut store = GalleryStore::load(Box::new(MemoryStorage::new())).await;

    let id = store
        .append(&payload(), pyrite_fixture())
        .await
        .unwrap()
        .id
        .clone();
    assert_eq!(store.len(), 1);

    assert!(store.delete(&id).await.unwrap());
    assert!(store.list().is_empty());
}

#[tokio::test]
async fn corrupt_stored_value_degrades_to_empty() {
    let backend = MemoryStorage::with_value("{ this is not json ]");
    let store = GalleryStore::load(Box::new(backend)).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn absent_stored_value_loads_empty() {
    let store = GalleryStore::load(Box::new(MemoryStorage::new())).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn mutations_write_through_to_the_backend() {
    let backend = MemoryStorage::new();

    let mut store = GalleryStore::load(Box::new(backend.clone())).await;
    let id = store
        .append(&payload(), pyrite_fixture())
        .await
        .unwrap()
        .id
        .clone();

    // A second store over the same backend sees the post-append snapshot.
    let reloaded = GalleryStore::load(Box::new(backend.clone())).await;
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.list()[0].id, id);

    store.delete(&id).await.unwrap();
    let reloaded = GalleryStore::load(Box::new(backend)).await;
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn file_backed_collection_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prospector_scans.json");

    let mut store = GalleryStore::load(Box::new(FsStorage::new(&path))).await;
    let created = store
        .append(&payload(), pyrite_fixture())
        .await
        .unwrap()
        .clone();

    let reloaded = GalleryStore::load(Box::new(FsStorage::new(&path))).await;
    assert_eq!(reloaded.list(), &[created][..]);
}

#[tokio::test]
async fn failed_append_rolls_the_collection_back() {
    let backend = FlakyStorage::new();
    backend.fail_writes(true);

    let mut store = GalleryStore::load(Box::new(backend.clone())).await;
    let err = store.append(&payload(), pyrite_fixture()).await.unwrap_err();
    assert_eq!(err.category(), "storage");

    // Memory and the stored snapshot must not diverge: the rejected scan is
    // gone from both.
    assert!(store.list().is_empty());
    assert_eq!(backend.get().await.unwrap(), None);

    // A later successful append persists exactly one scan, no phantom.
    backend.fail_writes(false);
    let id = store
        .append(&payload(), pyrite_fixture())
        .await
        .unwrap()
        .id
        .clone();
    let reloaded = GalleryStore::load(Box::new(backend)).await;
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.list()[0].id, id);
}

#[tokio::test]
async fn failed_delete_restores_the_scan() {
    let backend = FlakyStorage::new();
    let mut store = GalleryStore::load(Box::new(backend.clone())).await;
    let id = store
        .append(&payload(), pyrite_fixture())
        .await
        .unwrap()
        .id
        .clone();

    backend.fail_writes(true);
    let err = store.delete(&id).await.unwrap_err();
    assert_eq!(err.category(), "storage");
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].id, id);

    // The persisted snapshot still carries the scan too.
    let reloaded = GalleryStore::load(Box::new(backend)).await;
    assert_eq!(reloaded.list()[0].id, id);
}

#[tokio::test]
async fn corrupt_gallery_file_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prospector_scans.json");
    std::fs::write(&path, "<<definitely not json>>").unwrap();

    let store = GalleryStore::load(Box::new(FsStorage::new(&path))).await;
    assert!(store.is_empty());
}
